//! ICS parsing using the icalendar crate's parser.

use chrono::Duration;
use icalendar::parser::{self, read_calendar, unfold};

use super::time::{self, ResolvedTime};
use super::{CalendarDocument, CalendarParser, Component, EventComponent};
use crate::error::{DecodeError, DecodeResult};
use crate::event::Timestamp;

const CALENDAR_BEGIN: &str = "BEGIN:VCALENDAR";

/// RFC 5545 parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct IcsParser;

impl CalendarParser for IcsParser {
    fn parse(&self, raw: &[u8]) -> DecodeResult<CalendarDocument> {
        let content =
            std::str::from_utf8(raw).map_err(|e| DecodeError::InvalidUtf8(e.to_string()))?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let unfolded = unfold(content);
        let starts_with_calendar = unfolded
            .trim_start()
            .get(..CALENDAR_BEGIN.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(CALENDAR_BEGIN));
        if !starts_with_calendar {
            return Err(DecodeError::NotACalendar);
        }

        let calendar =
            read_calendar(&unfolded).map_err(|e| DecodeError::Grammar(e.to_string()))?;

        let components = calendar.components.iter().map(to_component).collect();
        Ok(CalendarDocument { components })
    }
}

fn to_component(component: &parser::Component<'_>) -> Component {
    if component.name.as_ref().eq_ignore_ascii_case("VEVENT") {
        Component::Event(to_event(component))
    } else {
        Component::Other {
            name: component.name.to_string(),
        }
    }
}

fn to_event(vevent: &parser::Component<'_>) -> EventComponent {
    let start = vevent.find_prop("DTSTART").and_then(time::resolve);
    if start.is_none() {
        tracing::warn!("event without a readable DTSTART");
    }

    let end = match vevent.find_prop("DTEND") {
        Some(prop) => time::resolve(prop).map(|t| t.at),
        None => start.and_then(|start| implied_end(vevent, start)),
    };

    EventComponent {
        start: start.map(|t| t.at),
        end,
        summary: text_prop(vevent, "SUMMARY"),
        description: text_prop(vevent, "DESCRIPTION"),
        location: text_prop(vevent, "LOCATION"),
    }
}

/// End of an event without DTEND: DTSTART + DURATION, or one day for
/// all-day events.
fn implied_end(vevent: &parser::Component<'_>, start: ResolvedTime) -> Option<Timestamp> {
    if let Some(prop) = vevent.find_prop("DURATION") {
        let duration = time::parse_duration(prop.val.as_ref());
        if duration.is_none() {
            tracing::warn!(value = %prop.val.as_ref(), "unreadable DURATION");
        }
        return duration.map(|d| start.at + d);
    }

    start.date_only.then(|| start.at + Duration::days(1))
}

/// TEXT values come back from `read_calendar` already unescaped.
fn text_prop(component: &parser::Component<'_>, name: &str) -> Option<String> {
    component.find_prop(name).map(|p| p.val.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN_CALENDAR: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Example//Export//EN\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:Europe/Berlin\r\n\
BEGIN:STANDARD\r\n\
DTSTART:19701025T030000\r\n\
TZOFFSETFROM:+0200\r\n\
TZOFFSETTO:+0100\r\n\
END:STANDARD\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
UID:standup@example.com\r\n\
DTSTART;TZID=Europe/Berlin:20240115T090000\r\n\
DTEND;TZID=Europe/Berlin:20240115T093000\r\n\
SUMMARY:Standup\r\n\
LOCATION:Room 4\\, 2nd floor\r\n\
DESCRIPTION:Agenda:\\nUpdates\\nBlockers\r\n\
BEGIN:VALARM\r\n\
TRIGGER:-PT10M\r\n\
ACTION:DISPLAY\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
BEGIN:VTODO\r\n\
UID:todo@example.com\r\n\
SUMMARY:Not an event\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_parse_keeps_component_order_and_kinds() {
        let doc = IcsParser.parse(BERLIN_CALENDAR.as_bytes()).unwrap();

        let names: Vec<_> = doc
            .components
            .iter()
            .map(|c| match c {
                Component::Event(_) => "VEVENT".to_string(),
                Component::Other { name } => name.clone(),
            })
            .collect();
        assert_eq!(names, vec!["VTIMEZONE", "VEVENT", "VTODO"]);
    }

    #[test]
    fn test_parse_resolves_tzid_times() {
        let doc = IcsParser.parse(BERLIN_CALENDAR.as_bytes()).unwrap();
        let event = doc.events().next().unwrap();

        assert_eq!(
            event.start.unwrap().to_rfc3339(),
            "2024-01-15T09:00:00+01:00"
        );
        assert_eq!(event.end.unwrap().to_rfc3339(), "2024-01-15T09:30:00+01:00");
    }

    #[test]
    fn test_parse_unescapes_text_values() {
        let doc = IcsParser.parse(BERLIN_CALENDAR.as_bytes()).unwrap();
        let event = doc.events().next().unwrap();

        assert_eq!(event.summary.as_deref(), Some("Standup"));
        assert_eq!(event.location.as_deref(), Some("Room 4, 2nd floor"));
        assert_eq!(
            event.description.as_deref(),
            Some("Agenda:\nUpdates\nBlockers")
        );
    }

    #[test]
    fn test_parse_utc_and_all_day() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
DTSTART:20240301T140000Z\r\n\
DTEND:20240301T150000Z\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:b\r\n\
DTSTART;VALUE=DATE:20240302\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let doc = IcsParser.parse(ics.as_bytes()).unwrap();
        let events: Vec<_> = doc.events().collect();

        assert_eq!(
            events[0].start.unwrap().to_rfc3339(),
            "2024-03-01T14:00:00+00:00"
        );
        assert_eq!(
            events[1].start.unwrap().to_rfc3339(),
            "2024-03-02T00:00:00+00:00"
        );
        assert_eq!(
            events[1].end.unwrap().to_rfc3339(),
            "2024-03-03T00:00:00+00:00"
        );
        assert_eq!(events[1].summary, None);
    }

    #[test]
    fn test_parse_duration_without_dtend() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
DTSTART:20240301T140000Z\r\n\
DURATION:PT1H30M\r\n\
SUMMARY:Workshop\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let doc = IcsParser.parse(ics.as_bytes()).unwrap();
        let event = doc.events().next().unwrap();

        assert_eq!(event.end.unwrap().to_rfc3339(), "2024-03-01T15:30:00+00:00");
    }

    #[test]
    fn test_parse_missing_times_are_none() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
SUMMARY:Someday\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let doc = IcsParser.parse(ics.as_bytes()).unwrap();
        let event = doc.events().next().unwrap();

        assert_eq!(event.start, None);
        assert_eq!(event.end, None);
    }

    #[test]
    fn test_parse_rejects_non_calendar() {
        let err = IcsParser
            .parse(b"<html><body>404 Not Found</body></html>")
            .unwrap_err();
        assert_eq!(err, DecodeError::NotACalendar);
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = IcsParser.parse(&[0x42, 0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let ics = "\u{feff}BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n";
        let doc = IcsParser.parse(ics.as_bytes()).unwrap();
        assert!(doc.components.is_empty());
    }

    #[test]
    fn test_parse_unescapes_text_only_once() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
DTSTART:20240301T140000Z\r\n\
SUMMARY:Backup\\; restore\r\n\
LOCATION:a\\,b\r\n\
DESCRIPTION:Copy to C:\\\\new and D:\\\\Notes\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let doc = IcsParser.parse(ics.as_bytes()).unwrap();
        let event = doc.events().next().unwrap();

        assert_eq!(event.summary.as_deref(), Some("Backup; restore"));
        assert_eq!(event.location.as_deref(), Some("a,b"));
        assert_eq!(
            event.description.as_deref(),
            Some(r"Copy to C:\new and D:\Notes")
        );
    }

    #[test]
    fn test_parse_matches_lowercase_event_components() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
begin:vevent\r\n\
UID:a\r\n\
DTSTART:20240301T140000Z\r\n\
DTEND:20240301T150000Z\r\n\
SUMMARY:Quiet export\r\n\
end:vevent\r\n\
END:VCALENDAR\r\n";

        let doc = IcsParser.parse(ics.as_bytes()).unwrap();
        let events: Vec<_> = doc.events().collect();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary.as_deref(), Some("Quiet export"));
        assert_eq!(
            events[0].start.unwrap().to_rfc3339(),
            "2024-03-01T14:00:00+00:00"
        );
    }
}
