//! Stack subtitles.
//!
//! Packs a contiguous run against its anchor (first or last subtitle) so
//! that every neighbour is exactly one gap away, keeping each duration.

use serde::{Deserialize, Serialize};

use crate::timing::selection::Selection;
use crate::timing::types::SubtitleList;
use crate::timing::{TimingEngine, TimingOutcome, TimingResult};

use super::TimePlan;

/// Which end of the run stays in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackDirection {
    /// First subtitle is the anchor; the rest follow it.
    #[default]
    FromStart,
    /// Last subtitle is the anchor; the rest precede it.
    FromEnd,
}

impl TimingEngine {
    /// Stack each contiguous run (2 or more subtitles) of the selection.
    pub fn stack(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        direction: StackDirection,
    ) -> TimingResult {
        self.finish("Stack", self.apply_stack(list, selection, direction))
    }

    fn apply_stack(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        direction: StackDirection,
    ) -> TimingResult {
        let runs = selection.runs_of_at_least(list, 2)?;
        let gap = self.policy.min_gap();

        let mut plan = TimePlan::new();
        for run in &runs {
            match direction {
                StackDirection::FromStart => {
                    let mut prev_end = list[run[0]].end;
                    for &index in &run[1..] {
                        let start = prev_end + gap;
                        let end = start + list[index].duration();
                        plan.push(index, start, end);
                        prev_end = end;
                    }
                }
                StackDirection::FromEnd => {
                    let mut next_start = list[run[run.len() - 1]].start;
                    for &index in run[..run.len() - 1].iter().rev() {
                        let end = next_start - gap;
                        let start = end - list[index].duration();
                        if start.is_negative() {
                            tracing::debug!(
                                "Stack: #{} would start at {}, clamping to zero",
                                list[index].num,
                                start
                            );
                        }
                        plan.push(index, start, end);
                        next_start = start;
                    }
                }
            }
        }

        let affected = plan.apply(list);
        Ok(TimingOutcome::new(
            affected,
            format!("{} subtitles stacked in {} run(s)", affected, runs.len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{Subtitle, TimingRefusal};

    fn list() -> SubtitleList {
        [
            Subtitle::from_millis(1000, 1500, "one"),
            Subtitle::from_millis(3000, 3700, "two"),
            Subtitle::from_millis(5000, 5300, "three"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn from_start_packs_after_first() {
        let mut list = list();
        let engine = TimingEngine::default();

        let outcome = engine
            .stack(&mut list, &Selection::range(0, 1), StackDirection::FromStart)
            .unwrap();

        assert_eq!(outcome.affected, 1);
        assert_eq!(list[0].start.as_millis(), 1000);
        assert_eq!(list[0].end.as_millis(), 1500);
        assert_eq!(list[1].start.as_millis(), 1600);
        assert_eq!(list[1].end.as_millis(), 2300);
        // Outside the selection
        assert_eq!(list[2].start.as_millis(), 5000);
    }

    #[test]
    fn from_start_gap_and_duration_invariants() {
        let mut list = list();
        let original = list.clone();
        let engine = TimingEngine::default();

        let all = Selection::all(&list);
        engine
            .stack(&mut list, &all, StackDirection::FromStart)
            .unwrap();

        for i in 0..list.len() {
            assert_eq!(list[i].duration(), original[i].duration());
            if i + 1 < list.len() {
                assert_eq!((list[i + 1].start - list[i].end).as_millis(), 100);
            }
        }
    }

    #[test]
    fn from_end_packs_before_last() {
        let mut list = list();
        let engine = TimingEngine::default();

        let all = Selection::all(&list);
        engine
            .stack(&mut list, &all, StackDirection::FromEnd)
            .unwrap();

        assert_eq!(list[2].start.as_millis(), 5000);
        assert_eq!(list[2].end.as_millis(), 5300);
        assert_eq!(list[1].end.as_millis(), 4900);
        assert_eq!(list[1].start.as_millis(), 4200);
        assert_eq!(list[0].end.as_millis(), 4100);
        assert_eq!(list[0].start.as_millis(), 3600);
    }

    #[test]
    fn stacking_is_idempotent() {
        let mut list = list();
        let engine = TimingEngine::default();
        let selection = Selection::all(&list);

        engine
            .stack(&mut list, &selection, StackDirection::FromStart)
            .unwrap();
        let once = list.clone();
        let outcome = engine
            .stack(&mut list, &selection, StackDirection::FromStart)
            .unwrap();

        assert_eq!(list, once);
        assert_eq!(outcome.affected, 0);
    }

    #[test]
    fn from_end_twice_is_a_fixed_point() {
        let mut list = list();
        let engine = TimingEngine::default();
        let selection = Selection::all(&list);

        engine
            .stack(&mut list, &selection, StackDirection::FromEnd)
            .unwrap();
        let once = list.clone();
        let outcome = engine
            .stack(&mut list, &selection, StackDirection::FromEnd)
            .unwrap();

        assert_eq!(list, once);
        assert_eq!(outcome.affected, 0);
    }

    #[test]
    fn from_end_clamps_at_zero() {
        let mut list: SubtitleList = [
            Subtitle::from_millis(0, 500, "one"),
            Subtitle::from_millis(200, 900, "two"),
            Subtitle::from_millis(1000, 1300, "three"),
        ]
        .into_iter()
        .collect();
        let engine = TimingEngine::default();
        let selection = Selection::all(&list);

        let outcome = engine
            .stack(&mut list, &selection, StackDirection::FromEnd)
            .unwrap();

        assert_eq!(outcome.affected, 1);
        assert_eq!((list[0].start.as_millis(), list[0].end.as_millis()), (0, 100));
        assert_eq!((list[1].start.as_millis(), list[1].end.as_millis()), (200, 900));
        assert_eq!((list[2].start.as_millis(), list[2].end.as_millis()), (1000, 1300));

        // Clamped times are already stacked.
        let again = engine
            .stack(&mut list, &selection, StackDirection::FromEnd)
            .unwrap();
        assert_eq!(again.affected, 0);
    }

    #[test]
    fn refuses_without_contiguous_pair() {
        let mut list = list();
        let original = list.clone();
        let engine = TimingEngine::default();

        let result = engine.stack(&mut list, &Selection::new([0, 2]), StackDirection::FromStart);

        assert_eq!(result, Err(TimingRefusal::NotContiguous { needed: 2 }));
        assert_eq!(list, original);
    }
}
