//! Timing refusals.
//!
//! A refusal means the operation declined to act: nothing was modified and
//! the `Display` text is meant to be shown to the user as a status message.

use super::timestamp::Timestamp;

/// Reasons a timing operation declines to act.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimingRefusal {
    /// Nothing selected.
    #[error("Please select at least one subtitle.")]
    EmptySelection,

    /// Selection is smaller than the operation needs.
    #[error("Please select at least {needed} subtitles.")]
    TooFewSubtitles { needed: usize, got: usize },

    /// No contiguous run of the required size in the selection.
    #[error("Please select at least {needed} contiguous subtitles.")]
    NotContiguous { needed: usize },

    /// Selection refers to a position outside the document.
    #[error("Subtitle at position {0} does not exist.")]
    OutOfRange(usize),

    /// The selected subtitles carry no timing-relevant text.
    #[error("The selected subtitles have no text to time.")]
    ZeroWeight,

    /// Interval too short to redistribute.
    #[error("Not enough time between {start} and {end} to redistribute subtitles.")]
    NotEnoughTime { start: Timestamp, end: Timestamp },

    /// Subtitle has no duration to split.
    #[error("Subtitle {num} has no duration to split.")]
    ZeroDuration { num: usize },

    /// Subtitle text cannot be broken into pieces.
    #[error("Subtitle {num} has nothing to split.")]
    NothingToSplit { num: usize },

    /// Scale anchors are missing, equal or out of order.
    #[error("Invalid anchor subtitles: {0}")]
    InvalidAnchors(String),

    /// Reading speed target is not positive.
    #[error("Characters per second must be greater than zero (got {0}).")]
    InvalidCps(f64),

    /// Policy values are inconsistent.
    #[error("Invalid timing policy: {0}")]
    InvalidPolicy(String),

    /// No subtitle could be changed (e.g. no neighbour to extend to).
    #[error("No subtitle could be changed: {0}")]
    NothingToChange(String),
}

impl TimingRefusal {
    /// Create an invalid anchors refusal.
    pub fn invalid_anchors(message: impl Into<String>) -> Self {
        Self::InvalidAnchors(message.into())
    }

    /// Create an invalid policy refusal.
    pub fn invalid_policy(message: impl Into<String>) -> Self {
        Self::InvalidPolicy(message.into())
    }

    /// Create a nothing-to-change refusal.
    pub fn nothing_to_change(message: impl Into<String>) -> Self {
        Self::NothingToChange(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            TimingRefusal::NotContiguous { needed: 2 }.to_string(),
            "Please select at least 2 contiguous subtitles."
        );
        assert_eq!(
            TimingRefusal::invalid_anchors("first must come before last").to_string(),
            "Invalid anchor subtitles: first must come before last"
        );
    }
}
