//! Core pipeline for ics-to-markdown.
//!
//! This crate turns raw `.ics` bytes into a Markdown table:
//! - `decode` parses a calendar into sorted `Event`s plus an `AttributePresence`
//! - `filter` restricts events to an optional time window
//! - `render` projects events into a table whose columns follow the presence map
//!
//! The calendar grammar parser and the description converter sit behind the
//! `CalendarParser` and `MarkdownConverter` traits.

pub mod convert;
pub mod decode;
pub mod error;
pub mod event;
pub mod filter;
pub mod ics;
pub mod line_break;
pub mod render;

pub use convert::{HtmlToMarkdown, MarkdownConverter};
pub use decode::{Decoded, Decoder, decode};
pub use error::{ConvertError, DecodeError, FilterParseError};
pub use event::{AttributePresence, Event, Timestamp, zero_timestamp};
pub use filter::{EventFilter, filter};
pub use ics::{CalendarDocument, CalendarParser, Component, EventComponent, IcsParser};
pub use line_break::{LINE_BREAK_MARKER, normalize};
pub use render::render;
