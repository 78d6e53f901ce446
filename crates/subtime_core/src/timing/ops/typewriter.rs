//! Typewriter effect.
//!
//! Replaces a subtitle with a sequence of subtitles that reveal its text
//! progressively, one character or one word at a time.

use std::ops::Range;

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::timing::error::TimingRefusal;
use crate::timing::selection::Selection;
use crate::timing::timestamp::Timestamp;
use crate::timing::types::{Subtitle, SubtitleList};
use crate::timing::weight::markup_ranges;
use crate::timing::{TimingEngine, TimingOutcome, TimingResult};

use super::split::{balance_tags, insert_pieces, SplitPiece};

/// ASS line break escapes: hard `\N` and soft `\n`.
static ESCAPED_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[Nn]").expect("escaped break pattern is valid"));

/// Unit revealed by each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypewriterSplit {
    /// One visible character per step.
    #[default]
    Character,
    /// One word per step.
    Word,
}

/// How the original duration is divided between the steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypewriterTiming {
    /// Equal slices.
    #[default]
    Linear,
    /// Random boundaries, seeded from the subtitle's start time.
    Random,
}

impl TimingEngine {
    /// Replace each selected subtitle with its typewriter steps.
    ///
    /// Subtitles with fewer than two steps or no duration are skipped; the
    /// operation is refused when nothing can be split. The random timing is
    /// reproducible for a given start time.
    pub fn typewriter(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        split: TypewriterSplit,
        timing: TypewriterTiming,
    ) -> TimingResult {
        self.finish(
            "Typewriter",
            self.apply_typewriter(list, selection, split, timing),
        )
    }

    fn apply_typewriter(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        split: TypewriterSplit,
        timing: TypewriterTiming,
    ) -> TimingResult {
        selection.validate(list)?;

        let mut plans: Vec<(usize, Vec<SplitPiece>)> = Vec::new();
        let mut first_refusal = None;
        for &index in selection.indices() {
            match plan_typewriter(&list[index], split, timing) {
                Ok(pieces) => plans.push((index, pieces)),
                Err(refusal) => {
                    tracing::debug!("Typewriter: skipping #{}: {}", list[index].num, refusal);
                    if first_refusal.is_none() {
                        first_refusal = Some(refusal);
                    }
                }
            }
        }

        if plans.is_empty() {
            return Err(first_refusal.unwrap_or(TimingRefusal::EmptySelection));
        }

        let new_selection = insert_pieces(list, plans);
        Ok(TimingOutcome::new(
            new_selection.len(),
            format!("{} typewriter steps created", new_selection.len()),
        )
        .with_selection(new_selection))
    }
}

fn plan_typewriter(
    subtitle: &Subtitle,
    split: TypewriterSplit,
    timing: TypewriterTiming,
) -> Result<Vec<SplitPiece>, TimingRefusal> {
    let prefixes = match split {
        TypewriterSplit::Character => character_prefixes(&subtitle.text),
        TypewriterSplit::Word => word_prefixes(&subtitle.text),
    };
    if prefixes.len() < 2 {
        return Err(TimingRefusal::NothingToSplit { num: subtitle.num });
    }
    let duration = subtitle.duration();
    if duration <= Timestamp::ZERO {
        return Err(TimingRefusal::ZeroDuration { num: subtitle.num });
    }

    let count = prefixes.len();
    let ends: Vec<Timestamp> = match timing {
        TypewriterTiming::Linear => (1..=count as u64)
            .map(|k| {
                duration
                    .mul_div(k, count as u64)
                    .map(|offset| subtitle.start + offset)
                    .ok_or(TimingRefusal::ZeroDuration { num: subtitle.num })
            })
            .collect::<Result<_, _>>()?,
        TypewriterTiming::Random => {
            let mut rng = StdRng::seed_from_u64(subtitle.start.as_millis() as u64);
            let mut offsets: Vec<i64> = (0..count)
                .map(|_| rng.gen_range(0..duration.as_millis()))
                .collect();
            offsets.sort_unstable();
            offsets
                .into_iter()
                .map(|offset| subtitle.start + Timestamp::from_millis(offset))
                .collect()
        }
    };

    let mut pieces = Vec::with_capacity(count);
    let mut start = subtitle.start;
    for (k, (text, end)) in prefixes.into_iter().zip(ends).enumerate() {
        // The last step always holds until the original end.
        let end = if k + 1 == count { subtitle.end } else { end };
        pieces.push(SplitPiece { start, end, text });
        start = end;
    }

    tracing::trace!(
        "Typewriter #{}: {} steps ({:?}, {:?})",
        subtitle.num,
        pieces.len(),
        split,
        timing
    );

    Ok(pieces)
}

/// How one byte position of a text counts when cutting steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Visible,
    /// Whitespace or an escaped line break.
    Separator,
    /// Inside an override block or inline tag.
    Markup,
}

struct GlyphMap {
    markup: Vec<Range<usize>>,
    breaks: Vec<Range<usize>>,
}

impl GlyphMap {
    fn new(text: &str) -> Self {
        Self {
            markup: markup_ranges(text),
            breaks: ESCAPED_BREAK_RE.find_iter(text).map(|m| m.range()).collect(),
        }
    }

    fn classify(&self, pos: usize, c: char) -> Glyph {
        let inside = |ranges: &[Range<usize>]| ranges.iter().any(|range| range.contains(&pos));
        if inside(&self.markup) {
            Glyph::Markup
        } else if c.is_whitespace() || inside(&self.breaks) {
            Glyph::Separator
        } else {
            Glyph::Visible
        }
    }
}

/// Cumulative prefixes ending on each visible character.
///
/// Whitespace, line breaks and markup never end a step; open tags are closed.
fn character_prefixes(text: &str) -> Vec<String> {
    let glyphs = GlyphMap::new(text);

    text.char_indices()
        .filter(|&(pos, c)| glyphs.classify(pos, c) == Glyph::Visible)
        .map(|(pos, c)| close_prefix(&text[..pos + c.len_utf8()]))
        .collect()
}

/// Cumulative prefixes ending on each word.
///
/// Markup belongs to whatever word surrounds it and never forms a word on
/// its own.
fn word_prefixes(text: &str) -> Vec<String> {
    let glyphs = GlyphMap::new(text);
    let mut prefixes = Vec::new();
    let mut in_word = false;

    for (pos, c) in text.char_indices() {
        match glyphs.classify(pos, c) {
            Glyph::Separator => {
                if in_word {
                    prefixes.push(close_prefix(&text[..pos]));
                }
                in_word = false;
            }
            Glyph::Visible => in_word = true,
            Glyph::Markup => {}
        }
    }
    if in_word {
        prefixes.push(text.to_string());
    }

    prefixes
}

fn close_prefix(prefix: &str) -> String {
    balance_tags(&[prefix]).pop().unwrap_or_default()
}
