//! Normalized event records and the dataset-wide presence map.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

/// A resolved point in time, kept with the offset it should be displayed in.
///
/// Ordering compares instants, so events in different zones sort correctly.
pub type Timestamp = DateTime<FixedOffset>;

const ZERO_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
    Some(date) => date,
    None => panic!("0001-01-01 is a valid date"),
};

/// Timestamp used when an event has no resolvable start or end
/// (0001-01-01T00:00:00Z).
pub fn zero_timestamp() -> Timestamp {
    ZERO_DATE.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

/// One calendar occurrence.
///
/// Fields are private: an event never changes after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    summary: String,
    start: Timestamp,
    end: Timestamp,
    description: String,
    location: String,
}

impl Event {
    pub fn new(
        summary: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Event {
            summary: summary.into(),
            start,
            end,
            description: description.into(),
            location: location.into(),
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Not guaranteed to be after `start`.
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Markdown text with line breaks already replaced by the inline marker.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Which attributes have a non-empty value anywhere in a dataset.
///
/// The renderer uses this to drop whole columns, so a calendar with no
/// locations gets no Location column at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePresence {
    pub start: bool,
    pub end: bool,
    pub summary: bool,
    pub description: bool,
    pub location: bool,
}

impl Default for AttributePresence {
    /// Start and end are always considered present.
    fn default() -> Self {
        AttributePresence {
            start: true,
            end: true,
            summary: false,
            description: false,
            location: false,
        }
    }
}

impl AttributePresence {
    /// Presence after also seeing `event`. Flags only ever turn on.
    #[must_use]
    pub fn observe(self, event: &Event) -> Self {
        AttributePresence {
            start: true,
            end: true,
            summary: self.summary || !event.summary.is_empty(),
            description: self.description || !event.description.is_empty(),
            location: self.location || !event.location.is_empty(),
        }
    }

    /// Compute presence over a whole event list.
    pub fn of<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        events
            .into_iter()
            .fold(AttributePresence::default(), AttributePresence::observe)
    }

    /// Date and Time columns share the start/end flags.
    pub fn has_time(&self) -> bool {
        self.start || self.end
    }
}
