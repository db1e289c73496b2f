//! Search string parsers.
//!
//! A parser turns whatever the user typed into the `LIKE` pattern every
//! comparison column is matched against.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9]").expect("static pattern is valid")
});

/// Removes every character that is not an ASCII letter or digit.
///
/// Spaces, punctuation and non-ASCII characters are dropped, not escaped.
pub fn strip_non_alphanumeric(input: &str) -> String {
    NON_ALPHANUMERIC.replace_all(input, "").into_owned()
}

/// Turns a raw search string into a `LIKE` pattern.
pub trait SearchParser: Send + Sync {
    /// Parses `input` into a pattern.
    fn parse(&self, input: &str) -> String;
}

/// Subsequence matching in the style of an editor's "go to file" picker.
///
/// `"abc"` becomes `%a%b%c%`, so any value containing `a`, `b` and `c` in
/// that order matches. Input with nothing alphanumeric yields `%%`, which
/// matches every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzySearch;

impl SearchParser for FuzzySearch {
    fn parse(&self, input: &str) -> String {
        let stripped = strip_non_alphanumeric(input);
        let mut pattern = String::with_capacity(stripped.len() * 2 + 1);
        pattern.push('%');
        for c in stripped.chars() {
            pattern.push(c);
            pattern.push('%');
        }
        if stripped.is_empty() {
            pattern.push('%');
        }
        pattern
    }
}

/// A parser backed by a caller-supplied closure.
pub struct CustomSearch {
    callback: Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl CustomSearch {
    /// Wraps `callback` as a parser.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl SearchParser for CustomSearch {
    fn parse(&self, input: &str) -> String {
        (self.callback)(input)
    }
}

impl fmt::Debug for CustomSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSearch").finish_non_exhaustive()
    }
}
