//! Authentication URL scraping.
//!
//! The CLI has no machine-readable auth output, so URLs are pulled out of
//! its human-oriented text. Trailing sentence punctuation is dropped.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("valid URL pattern"));

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', ')', ']', '}'];

fn urls(text: &str) -> impl DoubleEndedIterator<Item = &str> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
        .collect::<Vec<_>>()
        .into_iter()
}

/// First URL in `text`.
pub fn first_url(text: &str) -> Option<&str> {
    urls(text).next()
}

/// Last URL in `text`.
pub fn last_url(text: &str) -> Option<&str> {
    urls(text).next_back()
}
