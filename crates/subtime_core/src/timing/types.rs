//! Subtitle records and the ordered document collection.
//!
//! The engine reads `start`, `end`, `text` and `num`, and writes new time
//! pairs. Translation, note and style are carried along untouched and only
//! copied into records created by a split.

use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// A single caption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    /// 1-based position in the document.
    pub num: usize,
    /// Start time.
    pub start: Timestamp,
    /// End time.
    pub end: Timestamp,
    /// Displayed text (may contain markup).
    pub text: String,
    /// Translation text (not used for timing).
    pub translation: String,
    /// Free-form note (not used for timing).
    pub note: String,
    /// Style name (not used for timing).
    pub style: Option<String>,
}

impl Subtitle {
    /// Create a subtitle with the given times and text.
    ///
    /// `num` is assigned when the subtitle is added to a [`SubtitleList`].
    pub fn new(start: Timestamp, end: Timestamp, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Convenience constructor from millisecond values.
    pub fn from_millis(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        Self::new(
            Timestamp::from_millis(start_ms),
            Timestamp::from_millis(end_ms),
            text,
        )
    }

    /// Display duration.
    pub fn duration(&self) -> Timestamp {
        self.end - self.start
    }

    /// Set both times at once.
    ///
    /// Setting the start never moves the end: callers that want to keep
    /// the duration compute the new end themselves.
    pub fn set_times(&mut self, start: Timestamp, end: Timestamp) {
        self.start = start;
        self.end = end;
    }

    /// Copy non-timing metadata (translation, note, style) from `other`.
    pub fn copy_metadata_from(&mut self, other: &Subtitle) {
        self.translation = other.translation.clone();
        self.note = other.note.clone();
        self.style = other.style.clone();
    }
}

/// Ordered subtitle document.
///
/// Records are addressed by 0-based position. `num` is kept equal to
/// position + 1 across insertions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleList {
    subtitles: Vec<Subtitle>,
}

impl SubtitleList {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subtitles.
    pub fn len(&self) -> usize {
        self.subtitles.len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }

    /// Append a subtitle and return its position.
    pub fn push(&mut self, mut subtitle: Subtitle) -> usize {
        subtitle.num = self.subtitles.len() + 1;
        self.subtitles.push(subtitle);
        self.subtitles.len() - 1
    }

    /// Insert a subtitle immediately after `index` and return its position.
    ///
    /// Every following subtitle is renumbered.
    pub fn insert_after(&mut self, index: usize, subtitle: Subtitle) -> usize {
        let position = (index + 1).min(self.subtitles.len());
        self.subtitles.insert(position, subtitle);
        self.renumber_from(position);
        position
    }

    /// Subtitle at `index`.
    pub fn get(&self, index: usize) -> Option<&Subtitle> {
        self.subtitles.get(index)
    }

    /// Mutable subtitle at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Subtitle> {
        self.subtitles.get_mut(index)
    }

    /// Position of the subtitle numbered `num`.
    pub fn index_of_num(&self, num: usize) -> Option<usize> {
        (num >= 1 && num <= self.subtitles.len()).then(|| num - 1)
    }

    /// Position of the subtitle following `index`, if any.
    pub fn next_of(&self, index: usize) -> Option<usize> {
        (index + 1 < self.subtitles.len()).then(|| index + 1)
    }

    /// Position of the subtitle preceding `index`, if any.
    pub fn previous_of(&self, index: usize) -> Option<usize> {
        (index > 0 && index < self.subtitles.len()).then(|| index - 1)
    }

    /// Iterate over subtitles in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Subtitle> {
        self.subtitles.iter()
    }

    /// Iterate mutably over subtitles in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Subtitle> {
        self.subtitles.iter_mut()
    }

    /// All subtitles as a slice.
    pub fn as_slice(&self) -> &[Subtitle] {
        &self.subtitles
    }

    fn renumber_from(&mut self, position: usize) {
        for (i, subtitle) in self.subtitles.iter_mut().enumerate().skip(position) {
            subtitle.num = i + 1;
        }
    }
}

impl std::ops::Index<usize> for SubtitleList {
    type Output = Subtitle;

    fn index(&self, index: usize) -> &Subtitle {
        &self.subtitles[index]
    }
}

impl std::ops::IndexMut<usize> for SubtitleList {
    fn index_mut(&mut self, index: usize) -> &mut Subtitle {
        &mut self.subtitles[index]
    }
}

impl FromIterator<Subtitle> for SubtitleList {
    fn from_iter<I: IntoIterator<Item = Subtitle>>(iter: I) -> Self {
        let mut list = SubtitleList::new();
        for subtitle in iter {
            list.push(subtitle);
        }
        list
    }
}

impl<'a> IntoIterator for &'a SubtitleList {
    type Item = &'a Subtitle;
    type IntoIter = std::slice::Iter<'a, Subtitle>;

    fn into_iter(self) -> Self::IntoIter {
        self.subtitles.iter()
    }
}
