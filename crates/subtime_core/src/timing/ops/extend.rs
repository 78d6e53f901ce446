//! Extend length.
//!
//! Stretches selected subtitles toward their document neighbours, stopping
//! one gap short.

use serde::{Deserialize, Serialize};

use crate::timing::error::TimingRefusal;
use crate::timing::selection::Selection;
use crate::timing::types::SubtitleList;
use crate::timing::{TimingEngine, TimingOutcome, TimingResult};

use super::TimePlan;

/// Which side of the subtitle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtendDirection {
    /// Move the end up to the next subtitle's start minus the gap.
    #[default]
    Forward,
    /// Move the start back to the previous subtitle's end plus the gap.
    Backward,
}

impl TimingEngine {
    /// Extend each selected subtitle toward its neighbour.
    ///
    /// Neighbours are taken from the document, not the selection. Subtitles
    /// without a neighbour on that side, or whose interval would invert, are
    /// left alone.
    pub fn extend_length(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        direction: ExtendDirection,
    ) -> TimingResult {
        self.finish(
            "Extend length",
            self.apply_extend_length(list, selection, direction),
        )
    }

    fn apply_extend_length(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        direction: ExtendDirection,
    ) -> TimingResult {
        selection.validate(list)?;
        let gap = self.policy.min_gap();
        let mut plan = TimePlan::new();

        match direction {
            ExtendDirection::Forward => {
                for &index in selection.indices() {
                    let Some(next) = list.next_of(index) else {
                        continue;
                    };
                    let subtitle = &list[index];
                    let end = list[next].start - gap;
                    if end < subtitle.start {
                        tracing::debug!(
                            "Extend: #{} has no room before #{}",
                            subtitle.num,
                            list[next].num
                        );
                        continue;
                    }
                    plan.push(index, subtitle.start, end);
                }
            }
            ExtendDirection::Backward => {
                // Reverse order: each subtitle reads its predecessor before
                // that predecessor is planned.
                for &index in selection.indices().iter().rev() {
                    let Some(previous) = list.previous_of(index) else {
                        continue;
                    };
                    let subtitle = &list[index];
                    let start = list[previous].end + gap;
                    if start > subtitle.end {
                        tracing::debug!(
                            "Extend: #{} has no room after #{}",
                            subtitle.num,
                            list[previous].num
                        );
                        continue;
                    }
                    // End is written back explicitly; moving the start must
                    // not drag the end along.
                    plan.push(index, start, subtitle.end);
                }
            }
        }

        if plan.len() == 0 {
            return Err(TimingRefusal::nothing_to_change(
                "no neighbouring subtitle to extend to",
            ));
        }

        let affected = plan.apply(list);
        Ok(TimingOutcome::new(
            affected,
            format!("{} subtitles extended", affected),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::Subtitle;

    fn list() -> SubtitleList {
        [
            Subtitle::from_millis(0, 1000, "one"),
            Subtitle::from_millis(3000, 4000, "two"),
            Subtitle::from_millis(6000, 7000, "three"),
        ]
        .into_iter()
        .collect()
    }

    fn times(list: &SubtitleList) -> Vec<(i64, i64)> {
        list.iter()
            .map(|s| (s.start.as_millis(), s.end.as_millis()))
            .collect()
    }

    #[test]
    fn forward_extends_to_next_start() {
        let mut list = list();
        let outcome = TimingEngine::default()
            .extend_length(&mut list, &Selection::new([0, 1]), ExtendDirection::Forward)
            .unwrap();
        assert_eq!(outcome.affected, 2);
        assert_eq!(times(&list), vec![(0, 2900), (3000, 5900), (6000, 7000)]);
    }

    #[test]
    fn forward_uses_document_neighbour_outside_selection() {
        let mut list = list();
        TimingEngine::default()
            .extend_length(&mut list, &Selection::new([1]), ExtendDirection::Forward)
            .unwrap();
        assert_eq!(times(&list)[1], (3000, 5900));
    }

    #[test]
    fn backward_keeps_end_and_reads_unmodified_neighbour() {
        let mut list = list();
        let all = Selection::all(&list);
        TimingEngine::default()
            .extend_length(&mut list, &all, ExtendDirection::Backward)
            .unwrap();
        // #3 extends to the original end of #2, #2 to the end of #1.
        assert_eq!(times(&list), vec![(0, 1000), (1100, 4000), (4100, 7000)]);
    }

    #[test]
    fn last_subtitle_forward_is_refused() {
        let mut list = list();
        let original = list.clone();
        let result = TimingEngine::default().extend_length(
            &mut list,
            &Selection::new([2]),
            ExtendDirection::Forward,
        );
        assert!(matches!(result, Err(TimingRefusal::NothingToChange(_))));
        assert_eq!(list, original);
    }

    #[test]
    fn overlapping_neighbour_is_skipped() {
        let mut list: SubtitleList = [
            Subtitle::from_millis(1000, 3000, "one"),
            Subtitle::from_millis(1050, 4000, "two"),
        ]
        .into_iter()
        .collect();
        let result = TimingEngine::default().extend_length(
            &mut list,
            &Selection::new([0]),
            ExtendDirection::Forward,
        );
        assert!(matches!(result, Err(TimingRefusal::NothingToChange(_))));
        assert_eq!(times(&list)[0], (1000, 3000));
    }
}
