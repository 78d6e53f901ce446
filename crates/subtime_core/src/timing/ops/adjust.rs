//! Move and adjust.
//!
//! Shifts of selected subtitles by a fixed amount, either to a target start
//! time or by a signed step.

use serde::{Deserialize, Serialize};

use crate::timing::error::TimingRefusal;
use crate::timing::selection::Selection;
use crate::timing::timestamp::Timestamp;
use crate::timing::types::SubtitleList;
use crate::timing::{TimingEngine, TimingOutcome, TimingResult};

use super::TimePlan;

/// Subtitles that follow a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveScope {
    /// Only the selected subtitles.
    #[default]
    Selection,
    /// The selected subtitles and everything after the first of them.
    SelectionAndFollowing,
}

/// Which endpoint an adjustment changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustTarget {
    /// Move only the start.
    Start,
    /// Move only the end.
    End,
    /// Shift the whole subtitle.
    #[default]
    Both,
}

impl TimingEngine {
    /// Move the selection so that its first subtitle starts at `new_start`.
    ///
    /// Every moved subtitle keeps its duration. Times pushed below zero are
    /// clamped.
    pub fn move_subtitles(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        new_start: Timestamp,
        scope: MoveScope,
    ) -> TimingResult {
        self.finish(
            "Move",
            self.apply_move_subtitles(list, selection, new_start, scope),
        )
    }

    fn apply_move_subtitles(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        new_start: Timestamp,
        scope: MoveScope,
    ) -> TimingResult {
        selection.validate(list)?;
        let first = selection.first().ok_or(TimingRefusal::EmptySelection)?;
        let diff = new_start - list[first].start;
        tracing::debug!("Move: #{} to {} ({:+}ms)", list[first].num, new_start, diff.as_millis());

        let indices: Vec<usize> = match scope {
            MoveScope::Selection => selection.indices().to_vec(),
            MoveScope::SelectionAndFollowing => {
                let mut indices = selection.indices().to_vec();
                indices.extend(first..list.len());
                indices.sort_unstable();
                indices.dedup();
                indices
            }
        };

        let mut plan = TimePlan::new();
        for index in indices {
            let subtitle = &list[index];
            plan.push(index, subtitle.start + diff, subtitle.end + diff);
        }

        let affected = plan.apply(list);
        Ok(TimingOutcome::new(
            affected,
            format!("{} subtitles moved", affected),
        ))
    }

    /// Add `delta` to the start, the end or both of each selected subtitle.
    ///
    /// A subtitle whose interval would end before it starts is left alone;
    /// the call is refused only when no subtitle can be adjusted.
    pub fn adjust_time(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        target: AdjustTarget,
        delta: Timestamp,
    ) -> TimingResult {
        self.finish(
            "Adjust time",
            self.apply_adjust_time(list, selection, target, delta),
        )
    }

    fn apply_adjust_time(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        target: AdjustTarget,
        delta: Timestamp,
    ) -> TimingResult {
        selection.validate(list)?;

        let mut plan = TimePlan::new();
        for &index in selection.indices() {
            let subtitle = &list[index];
            let (start, end) = match target {
                AdjustTarget::Start => (subtitle.start + delta, subtitle.end),
                AdjustTarget::End => (subtitle.start, subtitle.end + delta),
                AdjustTarget::Both => (subtitle.start + delta, subtitle.end + delta),
            };
            if end.clamp_non_negative() < start.clamp_non_negative() {
                tracing::debug!("Adjust: #{} would end before it starts", subtitle.num);
                continue;
            }
            plan.push(index, start, end);
        }

        if plan.len() == 0 {
            return Err(TimingRefusal::nothing_to_change(
                "the adjustment would invert every selected subtitle",
            ));
        }

        let affected = plan.apply(list);
        Ok(TimingOutcome::new(
            affected,
            format!("{} subtitles adjusted", affected),
        ))
    }
}
