//! Timing operations.
//!
//! Each submodule adds methods to [`TimingEngine`](crate::timing::TimingEngine).
//! Operations compute a [`TimePlan`] first and only apply it once every
//! precondition has passed, so a refusal never leaves partial changes.

mod adjust;
mod bestfit;
mod duration;
mod extend;
mod scale;
mod split;
mod stack;
mod typewriter;

pub use adjust::{AdjustTarget, MoveScope};
pub use duration::DurationAnchor;
pub use extend::ExtendDirection;
pub use scale::ScaleRange;
pub use stack::StackDirection;
pub use typewriter::{TypewriterSplit, TypewriterTiming};

use super::timestamp::Timestamp;
use super::types::SubtitleList;

/// Pending time changes, in application order.
#[derive(Debug, Default)]
pub(crate) struct TimePlan {
    changes: Vec<(usize, Timestamp, Timestamp)>,
}

impl TimePlan {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.changes.len()
    }

    pub(crate) fn push(&mut self, index: usize, start: Timestamp, end: Timestamp) {
        self.changes.push((index, start, end));
    }

    /// Override the end of the most recently planned change.
    pub(crate) fn set_last_end(&mut self, end: Timestamp) {
        if let Some(last) = self.changes.last_mut() {
            last.2 = end;
        }
    }

    /// Write the planned times, clamped at zero.
    ///
    /// Returns how many subtitles actually changed.
    pub(crate) fn apply(self, list: &mut SubtitleList) -> usize {
        let mut changed = 0;
        for (index, start, end) in self.changes {
            let start = start.clamp_non_negative();
            let end = end.clamp_non_negative();
            if let Some(subtitle) = list.get_mut(index) {
                if subtitle.start != start || subtitle.end != end {
                    subtitle.set_times(start, end);
                    changed += 1;
                }
            }
        }
        changed
    }
}
