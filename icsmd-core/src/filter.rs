//! Time-window filtering of decoded events.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::error::FilterParseError;
use crate::event::{Event, Timestamp};

/// Time window for filtering events.
/// `None` means unbounded in that direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl EventFilter {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        EventFilter { start, end }
    }

    /// Build a filter from optional YYYY-MM-DD strings.
    ///
    /// `from` starts at 00:00:00 UTC. `to` runs up to and including midnight
    /// UTC after that date, which is where an all-day event on it ends. A
    /// string that does not parse leaves that side unbounded and is reported
    /// back so the caller can warn about it.
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> (Self, Vec<FilterParseError>) {
        let mut errors = Vec::new();

        let start = from.and_then(|s| {
            parse_date_start(s)
                .map_err(|e| errors.push(e))
                .ok()
        });
        let end = to.and_then(|s| {
            parse_date_end(s)
                .map_err(|e| errors.push(e))
                .ok()
        });

        (EventFilter { start, end }, errors)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `event` falls inside the window.
    ///
    /// The lower bound is checked against the event's start and the upper
    /// bound against its end, both inclusive.
    pub fn matches(&self, event: &Event) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => event.start() >= start && event.end() <= end,
            (Some(start), None) => event.start() >= start,
            (None, Some(end)) => event.end() <= end,
            (None, None) => true,
        }
    }
}

/// Events inside `window`, in their original order.
pub fn filter<'a>(events: &'a [Event], window: &EventFilter) -> Vec<&'a Event> {
    if window.is_unbounded() {
        return events.iter().collect();
    }

    let kept: Vec<&Event> = events.iter().filter(|e| window.matches(e)).collect();
    tracing::debug!(
        before = events.len(),
        after = kept.len(),
        ?window,
        "filtered events"
    );
    kept
}

fn parse_date(side: &'static str, s: &str) -> Result<NaiveDate, FilterParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| FilterParseError {
        side,
        input: s.to_string(),
    })
}

/// Parse YYYY-MM-DD as start of day in UTC
fn parse_date_start(s: &str) -> Result<Timestamp, FilterParseError> {
    let date = parse_date("start", s)?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

/// Parse YYYY-MM-DD as the midnight UTC that closes that day
fn parse_date_end(s: &str) -> Result<Timestamp, FilterParseError> {
    let date = parse_date("end", s)?;
    let next_day = date.checked_add_days(Days::new(1)).unwrap_or(date);
    Ok(next_day.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}
