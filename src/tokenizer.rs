//! Splits raw file text into bracketed tag tokens.

use crate::constants::TAG_PATTERN;
use regex::{CaptureMatches, Regex};
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| unsafe {
    Regex::new(TAG_PATTERN).unwrap_unchecked()
});

/// One `[KEY:VALUE]` tag. `value` is everything after the first colon,
/// unsplit, and empty for `[KEY]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub key: &'a str,
    pub value: &'a str,
    /// 1-based line the tag starts on.
    pub line: usize,
}

/// Lazy token iterator over one file's text. Call [`tokenize`] again to
/// restart from the beginning.
pub struct Tokens<'a> {
    text: &'a str,
    captures: CaptureMatches<'static, 'a>,
    offset: usize,
    line: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.captures.next()?;
        // Group 0 always exists, and the pattern has no optional groups.
        let (whole, key, value) =
            (captures.get(0)?, captures.get(1)?, captures.get(2)?);

        self.line += self.text[self.offset..whole.start()]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        self.offset = whole.start();

        Some(Token {
            key: key.as_str(),
            value: value.as_str(),
            line: self.line,
        })
    }
}

#[must_use]
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        text,
        captures: TAG_RE.captures_iter(text),
        offset: 0,
        line: 1,
    }
}
