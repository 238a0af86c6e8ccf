//! Error types for the conversion pipeline.

use thiserror::Error;

/// The input could not be read as a calendar. Fatal to a conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("ICS data is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("ICS data does not start with BEGIN:VCALENDAR")]
    NotACalendar,

    #[error("ICS parse error: {0}")]
    Grammar(String),
}

/// A filter bound could not be parsed. The bound is treated as unbounded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {side} date '{input}'. Expected YYYY-MM-DD")]
pub struct FilterParseError {
    pub side: &'static str,
    pub input: String,
}

/// A description could not be converted to Markdown. The raw text is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("conversion failed: {0}")]
    Failed(String),
}

/// Result type alias for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;
