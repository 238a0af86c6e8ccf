//! DTSTART/DTEND/DURATION resolution.

use chrono::{Duration, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use icalendar::parser::Property;
use icalendar::{CalendarDateTime, DatePerhapsTime};

use crate::event::Timestamp;

/// A resolved DTSTART/DTEND value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedTime {
    pub at: Timestamp,
    /// `VALUE=DATE` (all-day) rather than a date-time.
    pub date_only: bool,
}

/// Resolve a date or date-time property. `None` if the value is unreadable.
pub(crate) fn resolve(prop: &Property) -> Option<ResolvedTime> {
    match DatePerhapsTime::try_from(prop) {
        Ok(dpt) => Some(to_resolved(dpt)),
        Err(_) => {
            tracing::warn!(
                property = %prop.name.as_ref(),
                value = %prop.val.as_ref(),
                "unreadable date value, using zero time"
            );
            None
        }
    }
}

fn to_resolved(dpt: DatePerhapsTime) -> ResolvedTime {
    match dpt {
        DatePerhapsTime::Date(date) => ResolvedTime {
            at: date.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
            date_only: true,
        },
        DatePerhapsTime::DateTime(cal_dt) => {
            let at = match cal_dt {
                CalendarDateTime::Utc(dt) => dt.fixed_offset(),
                CalendarDateTime::Floating(naive) => naive.and_utc().fixed_offset(),
                CalendarDateTime::WithTimezone { date_time, tzid } => zoned(date_time, &tzid),
            };
            ResolvedTime {
                at,
                date_only: false,
            }
        }
    }
}

/// Wall-clock time in an IANA zone. Unknown zones and skipped local times
/// fall back to reading the wall clock as UTC.
fn zoned(date_time: NaiveDateTime, tzid: &str) -> Timestamp {
    let name = tzid.trim_matches('"').trim_start_matches('/');

    let Ok(tz) = name.parse::<Tz>() else {
        tracing::warn!(tzid, "unknown timezone, reading time as UTC");
        return date_time.and_utc().fixed_offset();
    };

    match tz.from_local_datetime(&date_time).earliest() {
        Some(dt) => dt.fixed_offset(),
        None => {
            tracing::warn!(tzid, %date_time, "local time does not exist, reading time as UTC");
            date_time.and_utc().fixed_offset()
        }
    }
}

/// Parse a DURATION value (`PT1H30M`, `-P1D`, `P2W`).
pub(crate) fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let is_negative = value.starts_with('-');
    let duration_str = value.trim_start_matches(['-', '+']);

    let duration = iso8601::duration(duration_str).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let duration = Duration::from_std(std_duration).ok()?;

    Some(if is_negative { -duration } else { duration })
}
