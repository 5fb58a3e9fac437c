//! Rich-text cleanup for Jira fields
//!
//! Jira stores summaries, descriptions and comments as HTML. Clubhouse gets
//! plain text: line-breaking tags become newlines, every other tag is dropped
//! and entities are decoded.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_BREAK: Regex =
        Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|tr|h[1-6]|pre|blockquote)\s*>").unwrap();
    static ref MARKUP: Regex = Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>").unwrap();
}

/// Strip HTML markup, keeping only the text content
pub fn sanitize_html(html: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(html, "\n");
    let stripped = MARKUP.replace_all(&with_breaks, "");
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded.trim().to_string()
}
