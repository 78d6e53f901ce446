//! Selections and contiguous runs.

use serde::{Deserialize, Serialize};

use super::error::TimingRefusal;
use super::types::SubtitleList;

/// Ordered set of subtitle positions chosen by the user.
///
/// Serialized as a plain list of positions. Deserializing goes through
/// [`Selection::new`], so the positions always come out sorted and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    /// Build a selection from positions. Duplicates are removed and the
    /// result is sorted.
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    /// Every subtitle of the document.
    pub fn all(list: &SubtitleList) -> Self {
        Self {
            indices: (0..list.len()).collect(),
        }
    }

    /// Inclusive range of positions.
    pub fn range(first: usize, last: usize) -> Self {
        Self {
            indices: (first..=last).collect(),
        }
    }

    /// Selected positions in document order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of selected subtitles.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// First selected position.
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    /// Check that every position exists in `list`.
    pub fn validate(&self, list: &SubtitleList) -> Result<(), TimingRefusal> {
        if self.indices.is_empty() {
            return Err(TimingRefusal::EmptySelection);
        }
        match self.indices.iter().find(|&&i| i >= list.len()) {
            Some(&index) => Err(TimingRefusal::OutOfRange(index)),
            None => Ok(()),
        }
    }

    /// Split into maximal contiguous runs.
    ///
    /// Two selected subtitles belong to the same run when their `num`
    /// values differ by exactly one. Positions outside `list` are ignored.
    pub fn runs(&self, list: &SubtitleList) -> Vec<Vec<usize>> {
        let mut runs: Vec<Vec<usize>> = Vec::new();
        let mut previous_num: Option<usize> = None;

        for &index in &self.indices {
            let Some(subtitle) = list.get(index) else {
                continue;
            };
            match (previous_num, runs.last_mut()) {
                (Some(prev), Some(run)) if subtitle.num == prev + 1 => run.push(index),
                _ => runs.push(vec![index]),
            }
            previous_num = Some(subtitle.num);
        }

        runs
    }

    /// Contiguous runs holding at least `min_len` subtitles.
    ///
    /// Refuses when the selection is empty or no run is long enough.
    pub fn runs_of_at_least(
        &self,
        list: &SubtitleList,
        min_len: usize,
    ) -> Result<Vec<Vec<usize>>, TimingRefusal> {
        self.validate(list)?;
        if self.len() < min_len {
            return Err(TimingRefusal::TooFewSubtitles {
                needed: min_len,
                got: self.len(),
            });
        }

        let runs: Vec<Vec<usize>> = self
            .runs(list)
            .into_iter()
            .filter(|run| run.len() >= min_len)
            .collect();

        if runs.is_empty() {
            return Err(TimingRefusal::NotContiguous { needed: min_len });
        }
        Ok(runs)
    }

    /// Whether the whole selection is a single contiguous run.
    pub fn is_contiguous(&self, list: &SubtitleList) -> bool {
        self.runs(list).len() == 1
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Self::new(indices)
    }
}

impl From<Selection> for Vec<usize> {
    fn from(selection: Selection) -> Self {
        selection.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::types::Subtitle;

    fn list_of(n: usize) -> SubtitleList {
        (0..n)
            .map(|i| Subtitle::from_millis(i as i64 * 1000, i as i64 * 1000 + 500, "x"))
            .collect()
    }

    #[test]
    fn new_sorts_and_dedups() {
        let selection = Selection::new([3, 1, 3, 2]);
        assert_eq!(selection.indices(), &[1, 2, 3]);
    }

    #[test]
    fn deserialized_selection_is_sorted_and_unique() {
        #[derive(Deserialize)]
        struct Saved {
            selection: Selection,
        }

        let saved: Saved = toml::from_str("selection = [2, 0, 2]").unwrap();
        assert_eq!(saved.selection.indices(), &[0, 2]);
    }

    #[test]
    fn runs_split_on_gaps() {
        let list = list_of(8);
        let selection = Selection::new([0, 1, 2, 4, 6, 7]);
        assert_eq!(
            selection.runs(&list),
            vec![vec![0, 1, 2], vec![4], vec![6, 7]]
        );
        assert!(!selection.is_contiguous(&list));
        assert!(Selection::range(2, 5).is_contiguous(&list));
    }

    #[test]
    fn runs_of_at_least_filters_singletons() {
        let list = list_of(8);
        let runs = Selection::new([0, 1, 4, 6, 7])
            .runs_of_at_least(&list, 2)
            .unwrap();
        assert_eq!(runs, vec![vec![0, 1], vec![6, 7]]);
    }

    #[test]
    fn runs_of_at_least_refuses() {
        let list = list_of(8);
        assert_eq!(
            Selection::default().runs_of_at_least(&list, 2),
            Err(TimingRefusal::EmptySelection)
        );
        assert_eq!(
            Selection::new([3]).runs_of_at_least(&list, 2),
            Err(TimingRefusal::TooFewSubtitles { needed: 2, got: 1 })
        );
        assert_eq!(
            Selection::new([1, 3, 5]).runs_of_at_least(&list, 2),
            Err(TimingRefusal::NotContiguous { needed: 2 })
        );
        assert_eq!(
            Selection::new([1, 9]).runs_of_at_least(&list, 2),
            Err(TimingRefusal::OutOfRange(9))
        );
    }
}
