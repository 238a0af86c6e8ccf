//! Calendar decoding: raw bytes to sorted, normalized events.

use crate::convert::{HtmlToMarkdown, MarkdownConverter};
use crate::error::DecodeResult;
use crate::event::{AttributePresence, Event, zero_timestamp};
use crate::ics::{CalendarParser, EventComponent, IcsParser};
use crate::line_break;

/// Events sorted by start, plus which attributes appear anywhere in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub events: Vec<Event>,
    pub presence: AttributePresence,
}

impl Decoded {
    pub fn into_parts(self) -> (Vec<Event>, AttributePresence) {
        (self.events, self.presence)
    }
}

/// Decodes calendars with a pluggable grammar parser and description converter.
#[derive(Debug, Default, Clone)]
pub struct Decoder<P = IcsParser, C = HtmlToMarkdown> {
    parser: P,
    converter: C,
}

impl<P: CalendarParser, C: MarkdownConverter> Decoder<P, C> {
    pub fn new(parser: P, converter: C) -> Self {
        Decoder { parser, converter }
    }

    /// Parse `raw` and return its VEVENTs sorted by start time.
    ///
    /// Events with equal starts keep their order in the file. Only a parse
    /// failure is an error; missing times, empty fields and unconvertible
    /// descriptions are all tolerated.
    pub fn decode(&self, raw: &[u8]) -> DecodeResult<Decoded> {
        let document = self.parser.parse(raw)?;

        let mut events: Vec<Event> = document
            .events()
            .map(|component| self.to_event(component))
            .collect();

        // Stable: ties keep input order.
        events.sort_by(|a, b| a.start().cmp(&b.start()));

        let presence = document
            .events()
            .fold(AttributePresence::default(), observe_raw);
        tracing::debug!(
            events = events.len(),
            components = document.components.len(),
            ?presence,
            "decoded calendar"
        );

        Ok(Decoded { events, presence })
    }

    fn to_event(&self, component: &EventComponent) -> Event {
        let summary = non_empty(component.summary.as_deref());
        let location = non_empty(component.location.as_deref());
        let description = non_empty(component.description.as_deref())
            .map(|raw| self.convert_description(raw))
            .unwrap_or_default();

        Event::new(
            summary.unwrap_or_default(),
            component.start.unwrap_or_else(zero_timestamp),
            component.end.unwrap_or_else(zero_timestamp),
            line_break::normalize(&description),
            location.unwrap_or_default(),
        )
    }

    fn convert_description(&self, raw: &str) -> String {
        match self.converter.convert(raw) {
            Ok(markdown) => markdown,
            Err(e) => {
                tracing::warn!(error = %e, "could not convert description, keeping raw text");
                raw.to_string()
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Presence counts the property as written, so a description whose markup
/// converts to nothing still gets its column.
fn observe_raw(presence: AttributePresence, component: &EventComponent) -> AttributePresence {
    let has = |value: &Option<String>| non_empty(value.as_deref()).is_some();
    AttributePresence {
        summary: presence.summary || has(&component.summary),
        description: presence.description || has(&component.description),
        location: presence.location || has(&component.location),
        ..presence
    }
}

/// Decode with the default ICS parser and HTML converter.
pub fn decode(raw: &[u8]) -> DecodeResult<Decoded> {
    Decoder::<IcsParser, HtmlToMarkdown>::default().decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConvertError, DecodeError};
    use crate::event::Timestamp;
    use crate::ics::{CalendarDocument, Component};
    use chrono::{TimeZone, Utc};

    fn at(day: u32, hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0)
            .unwrap()
            .fixed_offset()
    }

    /// Returns a fixed document regardless of input.
    struct FakeParser(CalendarDocument);

    impl CalendarParser for FakeParser {
        fn parse(&self, _raw: &[u8]) -> DecodeResult<CalendarDocument> {
            Ok(self.0.clone())
        }
    }

    struct FailingParser;

    impl CalendarParser for FailingParser {
        fn parse(&self, _raw: &[u8]) -> DecodeResult<CalendarDocument> {
            Err(DecodeError::Grammar("unexpected token".into()))
        }
    }

    struct Identity;

    impl MarkdownConverter for Identity {
        fn convert(&self, text: &str) -> Result<String, ConvertError> {
            Ok(text.to_string())
        }
    }

    struct Shouting;

    impl MarkdownConverter for Shouting {
        fn convert(&self, text: &str) -> Result<String, ConvertError> {
            Ok(text.to_uppercase())
        }
    }

    struct Blank;

    impl MarkdownConverter for Blank {
        fn convert(&self, _text: &str) -> Result<String, ConvertError> {
            Ok(String::new())
        }
    }

    struct Broken;

    impl MarkdownConverter for Broken {
        fn convert(&self, _text: &str) -> Result<String, ConvertError> {
            Err(ConvertError::Failed("boom".into()))
        }
    }

    fn event(summary: &str, start: Timestamp, end: Timestamp) -> Component {
        Component::Event(EventComponent {
            start: Some(start),
            end: Some(end),
            summary: Some(summary.to_string()),
            ..Default::default()
        })
    }

    fn doc(components: Vec<Component>) -> CalendarDocument {
        CalendarDocument { components }
    }

    #[test]
    fn test_decode_sorts_by_start_keeping_tie_order() {
        let parser = FakeParser(doc(vec![
            event("late", at(3, 9), at(3, 10)),
            event("tie-first", at(1, 9), at(1, 10)),
            event("early", at(1, 8), at(1, 9)),
            event("tie-second", at(1, 9), at(1, 11)),
        ]));

        let decoded = Decoder::new(parser, Identity).decode(b"").unwrap();
        let summaries: Vec<_> = decoded.events.iter().map(|e| e.summary()).collect();

        assert_eq!(summaries, vec!["early", "tie-first", "tie-second", "late"]);
        assert!(
            decoded
                .events
                .windows(2)
                .all(|pair| pair[0].start() <= pair[1].start())
        );
    }

    #[test]
    fn test_decode_ignores_other_components() {
        let parser = FakeParser(doc(vec![
            Component::Other {
                name: "VTIMEZONE".into(),
            },
            event("only", at(1, 9), at(1, 10)),
            Component::Other {
                name: "VTODO".into(),
            },
        ]));

        let decoded = Decoder::new(parser, Identity).decode(b"").unwrap();
        assert_eq!(decoded.events.len(), 1);
    }

    #[test]
    fn test_decode_missing_times_become_zero() {
        let parser = FakeParser(doc(vec![Component::Event(EventComponent {
            summary: Some("floating".into()),
            ..Default::default()
        })]));

        let decoded = Decoder::new(parser, Identity).decode(b"").unwrap();
        assert_eq!(decoded.events[0].start(), zero_timestamp());
        assert_eq!(decoded.events[0].end(), zero_timestamp());
    }

    #[test]
    fn test_decode_presence_ignores_empty_values() {
        let parser = FakeParser(doc(vec![
            Component::Event(EventComponent {
                start: Some(at(1, 9)),
                end: Some(at(1, 10)),
                summary: Some(String::new()),
                location: Some(String::new()),
                description: None,
            }),
            Component::Event(EventComponent {
                start: Some(at(2, 9)),
                end: Some(at(2, 10)),
                summary: None,
                location: Some("Library".into()),
                description: Some(String::new()),
            }),
        ]));

        let presence = Decoder::new(parser, Identity).decode(b"").unwrap().presence;

        assert!(presence.start && presence.end);
        assert!(presence.location);
        assert!(!presence.summary);
        assert!(!presence.description);
    }

    #[test]
    fn test_decode_converts_then_normalizes_description() {
        let parser = FakeParser(doc(vec![Component::Event(EventComponent {
            start: Some(at(1, 9)),
            end: Some(at(1, 10)),
            description: Some("first\r\nsecond\nthird".into()),
            ..Default::default()
        })]));

        let decoded = Decoder::new(parser, Shouting).decode(b"").unwrap();
        assert_eq!(decoded.events[0].description(), "FIRST<br>SECOND<br>THIRD");
    }

    #[test]
    fn test_decode_keeps_raw_description_when_conversion_fails() {
        let parser = FakeParser(doc(vec![Component::Event(EventComponent {
            start: Some(at(1, 9)),
            end: Some(at(1, 10)),
            description: Some("<p>raw\nhtml</p>".into()),
            ..Default::default()
        })]));

        let decoded = Decoder::new(parser, Broken).decode(b"").unwrap();
        assert_eq!(decoded.events[0].description(), "<p>raw<br>html</p>");
        assert!(decoded.presence.description);
    }

    #[test]
    fn test_decode_keeps_empty_conversion_and_presence() {
        let parser = FakeParser(doc(vec![Component::Event(EventComponent {
            start: Some(at(1, 9)),
            end: Some(at(1, 10)),
            description: Some("<p></p>".into()),
            ..Default::default()
        })]));

        let decoded = Decoder::new(parser, Blank).decode(b"").unwrap();
        assert_eq!(decoded.events[0].description(), "");
        assert!(decoded.presence.description);
    }

    #[test]
    fn test_decode_markup_only_description() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:1\r\n\
DTSTART:20240110T090000Z\r\n\
DTEND:20240110T093000Z\r\n\
SUMMARY:Standup\r\n\
DESCRIPTION:<br>\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let decoded = decode(ics.as_bytes()).unwrap();
        assert_eq!(decoded.events[0].description(), "");
        assert!(decoded.presence.description);
    }

    #[test]
    fn test_decode_propagates_parse_error() {
        let err = Decoder::new(FailingParser, Identity)
            .decode(b"whatever")
            .unwrap_err();
        assert_eq!(err, DecodeError::Grammar("unexpected token".into()));
    }

    #[test]
    fn test_decode_real_calendar() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Example//Export//EN\r\n\
BEGIN:VEVENT\r\n\
UID:2\r\n\
DTSTART:20240110T130000Z\r\n\
DTEND:20240110T140000Z\r\n\
SUMMARY:Lunch\r\n\
DESCRIPTION:<p>Bring <b>food</b></p>\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:1\r\n\
DTSTART:20240110T090000Z\r\n\
DTEND:20240110T093000Z\r\n\
SUMMARY:Standup\r\n\
DESCRIPTION:Line one\\nLine two\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let (events, presence) = decode(ics.as_bytes()).unwrap().into_parts();

        assert_eq!(events[0].summary(), "Standup");
        assert_eq!(events[0].description(), "Line one<br>Line two");
        assert_eq!(events[1].summary(), "Lunch");
        assert_eq!(events[1].description(), "Bring **food**");
        assert!(presence.summary && presence.description);
        assert!(!presence.location);
    }

    #[test]
    fn test_decode_malformed_bytes() {
        let result = decode(b"this is not a calendar");
        assert_eq!(result, Err(DecodeError::NotACalendar));
    }
}
