//! Text weight measurement.
//!
//! The weight of a subtitle is the number of characters a viewer has to
//! read. It drives every proportional distribution in the engine, so the
//! stripping rule is injectable: hosts with their own markup conventions
//! provide a [`TextWeigher`].

use once_cell::sync::Lazy;
use regex::Regex;

/// HTML-style tags (`<i>`, `</font>`) and ASS override blocks (`{\i1}`).
static MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>|\{[^}]*\}").expect("markup pattern is valid"));

/// Counts the timing-relevant characters of a subtitle text.
pub trait TextWeigher: Send + Sync {
    /// Character weight of `text`. Empty or whitespace-only text weighs 0.
    fn weight(&self, text: &str) -> u64;
}

impl<F> TextWeigher for F
where
    F: Fn(&str) -> u64 + Send + Sync,
{
    fn weight(&self, text: &str) -> u64 {
        self(text)
    }
}

/// Default weigher.
///
/// Removes markup, splits on line breaks (real newlines and the ASS `\N` /
/// `\n` escapes), trims each line and counts what is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupWeigher;

impl TextWeigher for MarkupWeigher {
    fn weight(&self, text: &str) -> u64 {
        strip_markup(text)
            .lines()
            .map(|line| line.trim().chars().count() as u64)
            .sum()
    }
}

/// Remove markup and normalise ASS line-break escapes to `\n`.
pub fn strip_markup(text: &str) -> String {
    MARKUP_RE
        .replace_all(text, "")
        .replace("\\N", "\n")
        .replace("\\n", "\n")
}

/// Byte ranges of the markup in `text`.
pub(crate) fn markup_ranges(text: &str) -> Vec<std::ops::Range<usize>> {
    MARKUP_RE.find_iter(text).map(|m| m.range()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_weigh_nothing() {
        assert_eq!(MarkupWeigher.weight(""), 0);
        assert_eq!(MarkupWeigher.weight("   \n\t  "), 0);
        assert_eq!(MarkupWeigher.weight("<i> </i>"), 0);
    }

    #[test]
    fn markup_is_not_counted() {
        assert_eq!(MarkupWeigher.weight("<i>Hello</i>"), 5);
        assert_eq!(MarkupWeigher.weight("{\\an8}Hello"), 5);
        assert_eq!(MarkupWeigher.weight("<font color=\"red\">ab</font>"), 2);
    }

    #[test]
    fn line_breaks_are_not_counted() {
        assert_eq!(MarkupWeigher.weight("Hello\nworld"), 10);
        assert_eq!(MarkupWeigher.weight("Hello\\Nworld"), 10);
        assert_eq!(MarkupWeigher.weight("  Hello  \n  big world "), 14);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(MarkupWeigher.weight("héllo"), 5);
        assert_eq!(MarkupWeigher.weight("日本語"), 3);
    }

    #[test]
    fn closures_are_weighers() {
        let bytes = |text: &str| text.len() as u64;
        assert_eq!(bytes.weight("abc"), 3);
    }
}
