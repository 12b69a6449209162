use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every run of whitespace (including newlines and non-breaking
/// spaces) into a single space and trim the ends.
///
/// Scraped text nodes keep the indentation and line breaks of the HTML
/// source, so each block of article text goes through this before it is
/// joined with its neighbours.
///
/// # Example
///
/// ```
/// use scrappy::utils::collapse_whitespace;
///
/// let raw = "\n    Liverpool\u{a0}won\n\n   again.  ";
/// assert_eq!(collapse_whitespace(raw), "Liverpool won again.");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
