//! Minimize and idealize duration.
//!
//! Both fit each subtitle's duration to its text at a reading speed:
//! "minimize" uses the fastest acceptable speed, "idealize" the comfortable
//! one. The result never drops below the minimum display duration.

use serde::{Deserialize, Serialize};

use crate::timing::error::TimingRefusal;
use crate::timing::policy::duration_for_chars;
use crate::timing::selection::Selection;
use crate::timing::timestamp::Timestamp;
use crate::timing::types::SubtitleList;
use crate::timing::{TimingEngine, TimingOutcome, TimingResult};

use super::TimePlan;

/// Which endpoint stays fixed while the duration changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationAnchor {
    /// Keep the start, move the end.
    #[default]
    KeepStart,
    /// Keep the end, move the start.
    KeepEnd,
}

impl TimingEngine {
    /// Shorten each selected subtitle to the duration required at the
    /// maximum reading speed.
    pub fn minimize_duration(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        anchor: DurationAnchor,
    ) -> TimingResult {
        let cps = self.policy.max_cps();
        self.finish(
            "Minimize duration",
            self.apply_duration_for_cps(list, selection, cps, anchor),
        )
    }

    /// Set each selected subtitle to the duration required at the ideal
    /// reading speed.
    pub fn idealize_duration(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        anchor: DurationAnchor,
    ) -> TimingResult {
        let cps = self.policy.ideal_cps();
        self.finish(
            "Idealize duration",
            self.apply_duration_for_cps(list, selection, cps, anchor),
        )
    }

    /// Fit each selected subtitle to `target_cps`, never below the minimum
    /// display duration.
    pub fn duration_for_cps(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        target_cps: f64,
        anchor: DurationAnchor,
    ) -> TimingResult {
        self.finish(
            "Fit duration",
            self.apply_duration_for_cps(list, selection, target_cps, anchor),
        )
    }

    fn apply_duration_for_cps(
        &self,
        list: &mut SubtitleList,
        selection: &Selection,
        target_cps: f64,
        anchor: DurationAnchor,
    ) -> TimingResult {
        selection.validate(list)?;
        if !(target_cps.is_finite() && target_cps > 0.0) {
            return Err(TimingRefusal::InvalidCps(target_cps));
        }

        let mut plan = TimePlan::new();
        for &index in selection.indices() {
            let subtitle = &list[index];
            let chars = self.weight(&subtitle.text);
            let duration =
                duration_for_chars(chars, target_cps)?.max(self.policy.min_display());

            tracing::trace!(
                "  #{}: {} chars at {} cps -> {}ms",
                subtitle.num,
                chars,
                target_cps,
                duration.as_millis()
            );

            match anchor {
                DurationAnchor::KeepStart => {
                    plan.push(index, subtitle.start, subtitle.start + duration)
                }
                // An end too early for the duration slides the subtitle to zero
                // instead of cutting it short.
                DurationAnchor::KeepEnd if subtitle.end < duration => {
                    plan.push(index, Timestamp::ZERO, duration)
                }
                DurationAnchor::KeepEnd => plan.push(index, subtitle.end - duration, subtitle.end),
            }
        }

        let affected = plan.apply(list);
        Ok(TimingOutcome::new(
            affected,
            format!(
                "{} subtitles fitted to {} characters per second",
                affected, target_cps
            ),
        ))
    }
}
