//! Subtitle timing engine.
//!
//! Pure arithmetic over an ordered subtitle document: redistribution,
//! stacking, scaling, duration fitting, extension and splitting, all subject
//! to a [`TimingPolicy`].
//!
//! # Architecture
//!
//! - **timestamp**: integral millisecond type
//! - **types**: subtitle records and the document collection
//! - **selection**: user selections and contiguous runs
//! - **weight**: injectable text weight measurement
//! - **policy**: gap / display / reading speed limits
//! - **ops**: the timing operations, as methods on [`TimingEngine`]
//! - **check**: read-only timing audit
//!
//! # Failure semantics
//!
//! Operations return [`TimingResult`]. A [`TimingRefusal`] means nothing was
//! modified; its `Display` text is the advisory message for the user.
//! Preconditions are always checked before the first mutation.
//!
//! # Usage
//!
//! ```
//! use subtime_core::timing::{
//!     Selection, StackDirection, Subtitle, SubtitleList, TimingEngine, TimingPolicy,
//! };
//!
//! let mut list: SubtitleList = [
//!     Subtitle::from_millis(0, 500, "Hello"),
//!     Subtitle::from_millis(2000, 2700, "world"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let engine = TimingEngine::new(TimingPolicy::default());
//! let all = Selection::all(&list);
//! let outcome = engine
//!     .stack(&mut list, &all, StackDirection::FromStart)
//!     .unwrap();
//!
//! assert_eq!(outcome.affected, 1);
//! assert_eq!(list[1].start.as_millis(), 600);
//! ```

pub mod check;
mod error;
mod ops;
mod policy;
mod selection;
mod timestamp;
mod types;
mod weight;

use serde::Serialize;

pub use check::{TimingIssue, TimingIssueKind};
pub use error::TimingRefusal;
pub use ops::{
    AdjustTarget, DurationAnchor, ExtendDirection, MoveScope, ScaleRange, StackDirection,
    TypewriterSplit, TypewriterTiming,
};
pub use policy::{chars_per_second, duration_for_chars, TimingPolicy};
pub use selection::Selection;
pub use timestamp::Timestamp;
pub use types::{Subtitle, SubtitleList};
pub use weight::{strip_markup, MarkupWeigher, TextWeigher};

/// Result of a timing operation.
pub type TimingResult = Result<TimingOutcome, TimingRefusal>;

/// What a successful timing operation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingOutcome {
    /// Number of subtitles whose times changed.
    pub affected: usize,
    /// Status message for the user.
    pub summary: String,
    /// New selection, when the operation replaces it (split).
    pub selection: Option<Selection>,
}

impl TimingOutcome {
    /// Outcome without a selection change.
    pub fn new(affected: usize, summary: impl Into<String>) -> Self {
        Self {
            affected,
            summary: summary.into(),
            selection: None,
        }
    }

    /// Attach the selection the host should switch to.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// Entry point for every timing operation.
///
/// Holds the policy and the text weigher for one or more invocations.
/// Stateless between calls: identical inputs give identical results (the
/// random typewriter is seeded from the subtitle it splits).
pub struct TimingEngine {
    policy: TimingPolicy,
    weigher: Box<dyn TextWeigher>,
}

impl TimingEngine {
    /// Create an engine using the default [`MarkupWeigher`].
    pub fn new(policy: TimingPolicy) -> Self {
        Self {
            policy,
            weigher: Box::new(MarkupWeigher),
        }
    }

    /// Replace the text weigher.
    pub fn with_weigher(mut self, weigher: impl TextWeigher + 'static) -> Self {
        self.weigher = Box::new(weigher);
        self
    }

    /// The policy in effect.
    pub fn policy(&self) -> &TimingPolicy {
        &self.policy
    }

    /// Weight of `text` according to the configured weigher.
    pub fn weight(&self, text: &str) -> u64 {
        self.weigher.weight(text)
    }

    /// Log the result of an operation and hand it back.
    fn finish(&self, operation: &str, result: TimingResult) -> TimingResult {
        match &result {
            Ok(outcome) => tracing::info!("{}: {}", operation, outcome.summary),
            Err(refusal) => tracing::warn!("{} refused: {}", operation, refusal),
        }
        result
    }
}

impl std::fmt::Debug for TimingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimingEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for TimingEngine {
    fn default() -> Self {
        Self::new(TimingPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_weigher_is_used() {
        let engine = TimingEngine::default().with_weigher(|text: &str| text.len() as u64 * 2);
        assert_eq!(engine.weight("abc"), 6);
        assert_eq!(TimingEngine::default().weight("<i>abc</i>"), 3);
    }

    #[test]
    fn refusal_is_returned_not_raised() {
        crate::logging::init_test_tracing();
        let mut list = SubtitleList::new();
        let result = TimingEngine::default().stack(
            &mut list,
            &Selection::default(),
            StackDirection::FromStart,
        );
        assert_eq!(result, Err(TimingRefusal::EmptySelection));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TimingEngine>();
    }
}
