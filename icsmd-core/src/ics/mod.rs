//! Calendar grammar parsing.
//!
//! `CalendarParser` turns raw bytes into a `CalendarDocument`, a neutral view
//! of the calendar's components. `IcsParser` is the RFC 5545 implementation
//! backed by the icalendar crate.

mod parse;
mod time;

pub use parse::IcsParser;

use crate::error::DecodeResult;
use crate::event::Timestamp;

/// Parses raw calendar bytes into a document.
pub trait CalendarParser {
    fn parse(&self, raw: &[u8]) -> DecodeResult<CalendarDocument>;
}

/// A parsed calendar: its top-level components in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarDocument {
    pub components: Vec<Component>,
}

impl CalendarDocument {
    pub fn events(&self) -> impl Iterator<Item = &EventComponent> {
        self.components.iter().filter_map(|c| match c {
            Component::Event(event) => Some(event),
            Component::Other { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Event(EventComponent),
    /// Timezones, todos, journals, ... carried by name only.
    Other { name: String },
}

/// A VEVENT with its times resolved and TEXT values unescaped.
///
/// `None` means the property was missing (or its time could not be resolved).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventComponent {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}
