//! Rich-text to Markdown conversion for event descriptions.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConvertError;

/// Converts a description into Markdown.
///
/// Failure is never fatal: the decoder keeps the raw text when this errors.
pub trait MarkdownConverter {
    fn convert(&self, text: &str) -> Result<String, ConvertError>;
}

static RE_HTML_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?[a-z][a-z0-9]*(\s[^<>]*)?/?>|&(#[0-9]+|#x[0-9a-f]+|[a-z]+);")
        .expect("valid html markup regex")
});

/// HTML descriptions (as sent by Google and Outlook) rendered with `html2md`.
///
/// Plain text passes through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlToMarkdown;

impl HtmlToMarkdown {
    pub fn looks_like_html(text: &str) -> bool {
        RE_HTML_MARKUP.is_match(text)
    }
}

impl MarkdownConverter for HtmlToMarkdown {
    fn convert(&self, text: &str) -> Result<String, ConvertError> {
        if !Self::looks_like_html(text) {
            return Ok(text.to_string());
        }

        let markdown = html2md::parse_html(text);
        Ok(markdown.trim().to_string())
    }
}
