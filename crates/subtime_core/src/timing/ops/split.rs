//! Split subtitles by line.
//!
//! A multi-line subtitle becomes one subtitle per line. Time is shared in
//! proportion to each line's weight, then every inner boundary is opened by
//! half a gap on each side. Inline tags left open at a line break are closed
//! there and reopened on the next line.
//!
//! This module also holds the piece insertion shared with the typewriter.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::timing::error::TimingRefusal;
use crate::timing::selection::Selection;
use crate::timing::timestamp::Timestamp;
use crate::timing::types::{Subtitle, SubtitleList};
use crate::timing::{TimingEngine, TimingOutcome, TimingResult};

/// HTML-style inline tag: `<i>`, `</i>`, `<font color="red">`.
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([A-Za-z]+)[^>]*>").expect("tag pattern is valid"));

/// Line breaks: real newlines and the ASS `\N` escape.
static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n|\\N").expect("line break pattern is valid"));

/// One piece of a split subtitle.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SplitPiece {
    pub start: Timestamp,
    pub end: Timestamp,
    pub text: String,
}

impl TimingEngine {
    /// Split every selected multi-line subtitle into one subtitle per line.
    ///
    /// Single-line or zero-length subtitles in the selection are skipped;
    /// the operation is refused when nothing can be split. On success the
    /// outcome carries the new pieces as the selection.
    pub fn split_lines(&self, list: &mut SubtitleList, selection: &Selection) -> TimingResult {
        self.finish("Split", self.apply_split_lines(list, selection))
    }

    fn apply_split_lines(&self, list: &mut SubtitleList, selection: &Selection) -> TimingResult {
        selection.validate(list)?;

        let mut plans: Vec<(usize, Vec<SplitPiece>)> = Vec::new();
        let mut first_refusal = None;
        for &index in selection.indices() {
            match self.plan_line_split(&list[index]) {
                Ok(pieces) => plans.push((index, pieces)),
                Err(refusal) => {
                    tracing::debug!("Split: skipping #{}: {}", list[index].num, refusal);
                    if first_refusal.is_none() {
                        first_refusal = Some(refusal);
                    }
                }
            }
        }

        if plans.is_empty() {
            return Err(first_refusal.unwrap_or(TimingRefusal::EmptySelection));
        }

        let split_count = plans.len();
        let new_selection = insert_pieces(list, plans);
        Ok(TimingOutcome::new(
            new_selection.len(),
            format!(
                "{} subtitle(s) split into {} pieces",
                split_count,
                new_selection.len()
            ),
        )
        .with_selection(new_selection))
    }

    fn plan_line_split(&self, subtitle: &Subtitle) -> Result<Vec<SplitPiece>, TimingRefusal> {
        let lines: Vec<&str> = LINE_BREAK_RE
            .split(&subtitle.text)
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.len() < 2 {
            return Err(TimingRefusal::NothingToSplit { num: subtitle.num });
        }
        let duration = subtitle.duration();
        if duration <= Timestamp::ZERO {
            return Err(TimingRefusal::ZeroDuration { num: subtitle.num });
        }

        let texts = balance_tags(&lines);
        let mut weights: Vec<u64> = lines.iter().map(|line| self.weight(line)).collect();
        let mut total: u64 = weights.iter().sum();
        if total == 0 {
            weights = vec![1; lines.len()];
            total = lines.len() as u64;
        }

        let half_gap = self.policy.min_gap() / 2;
        let count = texts.len();
        let mut pieces = Vec::with_capacity(count);
        let mut prev_weight: u64 = 0;

        for (k, (text, weight)) in texts.into_iter().zip(weights).enumerate() {
            let mut start = subtitle.start
                + duration
                    .mul_div(prev_weight, total)
                    .ok_or(TimingRefusal::ZeroWeight)?;
            let mut end = if k + 1 == count {
                subtitle.end
            } else {
                subtitle.start
                    + duration
                        .mul_div(prev_weight + weight, total)
                        .ok_or(TimingRefusal::ZeroWeight)?
            };
            if k > 0 {
                start += half_gap;
            }
            if k + 1 < count {
                end -= half_gap;
            }
            prev_weight += weight;

            // Gap compensation never pushes a piece outside the original span.
            let start = start.clamp(subtitle.start, subtitle.end);
            let end = end.clamp(start, subtitle.end);
            pieces.push(SplitPiece { start, end, text });
        }

        Ok(pieces)
    }
}

/// Replace each planned subtitle with its pieces.
///
/// The original record becomes the first piece; the rest are inserted right
/// after it with the original's metadata. Plans are applied in ascending
/// position order. Returns the selection covering every piece.
pub(crate) fn insert_pieces(
    list: &mut SubtitleList,
    mut plans: Vec<(usize, Vec<SplitPiece>)>,
) -> Selection {
    let mut inserted = 0;
    let mut selected = Vec::new();

    plans.sort_by_key(|(index, _)| *index);
    for (index, pieces) in plans {
        let index = index + inserted;
        let mut pieces = pieces.into_iter();
        let Some(first) = pieces.next() else {
            continue;
        };

        let template = list[index].clone();
        list[index].set_times(first.start.clamp_non_negative(), first.end.clamp_non_negative());
        list[index].text = first.text;
        selected.push(index);

        let mut previous = index;
        for piece in pieces {
            let mut subtitle = Subtitle::new(
                piece.start.clamp_non_negative(),
                piece.end.clamp_non_negative(),
                piece.text,
            );
            subtitle.copy_metadata_from(&template);
            previous = list.insert_after(previous, subtitle);
            selected.push(previous);
            inserted += 1;
        }
    }

    Selection::new(selected)
}

/// Close tags left open at the end of each line and reopen them at the start
/// of the next one, so every line is well-formed on its own.
pub(crate) fn balance_tags<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut open: Vec<(String, String)> = Vec::new();
    let mut result = Vec::with_capacity(lines.len());

    for line in lines {
        let line = line.as_ref();
        let mut text: String = open.iter().map(|(_, tag)| tag.as_str()).collect();

        for caps in TAG_RE.captures_iter(line) {
            let name = caps[2].to_ascii_lowercase();
            if &caps[1] == "/" {
                if let Some(pos) = open.iter().rposition(|(open_name, _)| *open_name == name) {
                    open.remove(pos);
                }
            } else {
                open.push((name, caps[0].to_string()));
            }
        }

        text.push_str(line);
        for (name, _) in open.iter().rev() {
            text.push_str(&format!("</{}>", name));
        }
        result.push(text);
    }

    result
}
