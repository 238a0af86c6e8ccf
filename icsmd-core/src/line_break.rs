//! Line-break normalization for single-cell table text.

use std::sync::LazyLock;

use regex::Regex;

/// Inline break substituted for every line terminator.
pub const LINE_BREAK_MARKER: &str = "<br>";

// CRLF first so the pair is replaced once.
static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\x0B\x0C\r\x{0085}\x{2028}\x{2029}]").expect("valid line break regex")
});

/// Replace every Unicode line terminator (CRLF, LF, VT, FF, CR, NEL, LS, PS)
/// with [`LINE_BREAK_MARKER`]. All other characters are left alone.
pub fn normalize(text: &str) -> String {
    RE_LINE_BREAK
        .replace_all(text, LINE_BREAK_MARKER)
        .into_owned()
}
