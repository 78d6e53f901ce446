//! Read-only timing audit.
//!
//! Reports subtitles that break the policy without changing anything, so a
//! host can highlight them before the user picks an operation.

use serde::Serialize;

use super::policy::chars_per_second;
use super::types::SubtitleList;
use super::TimingEngine;

/// Kind of timing problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingIssueKind {
    /// Ends after the next subtitle starts.
    Overlap,
    /// Gap to the next subtitle is below the minimum.
    GapTooSmall,
    /// Shown for less than the minimum display duration.
    TooShort,
    /// Reading speed above the maximum.
    TooFast,
    /// Reading speed below the minimum.
    TooSlow,
}

/// One timing problem found by [`TimingEngine::check_timing`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingIssue {
    /// 0-based position of the subtitle.
    pub index: usize,
    /// Subtitle number.
    pub num: usize,
    /// What was found.
    pub kind: TimingIssueKind,
    /// Measured value: milliseconds for overlap, gap and duration, characters
    /// per second for reading speed.
    pub value: f64,
}

impl TimingEngine {
    /// List every policy violation in `list`, in document order.
    pub fn check_timing(&self, list: &SubtitleList) -> Vec<TimingIssue> {
        let policy = &self.policy;
        let mut issues = Vec::new();

        for (index, subtitle) in list.iter().enumerate() {
            let mut report = |kind: TimingIssueKind, value: f64| {
                tracing::trace!("Check: #{} {:?} ({})", subtitle.num, kind, value);
                issues.push(TimingIssue {
                    index,
                    num: subtitle.num,
                    kind,
                    value,
                });
            };

            if let Some(next) = list.get(index + 1) {
                let gap = next.start - subtitle.end;
                if gap.is_negative() {
                    report(TimingIssueKind::Overlap, -gap.as_millis() as f64);
                } else if gap < policy.min_gap() {
                    report(TimingIssueKind::GapTooSmall, gap.as_millis() as f64);
                }
            }

            let duration = subtitle.duration();
            if duration < policy.min_display() {
                report(TimingIssueKind::TooShort, duration.as_millis() as f64);
            }

            let chars = self.weight(&subtitle.text);
            if chars == 0 {
                continue;
            }
            if let Some(cps) = chars_per_second(chars, duration) {
                if cps > policy.max_cps() {
                    report(TimingIssueKind::TooFast, cps);
                } else if cps < policy.min_cps() {
                    report(TimingIssueKind::TooSlow, cps);
                }
            }
        }

        tracing::debug!("Check: {} issues in {} subtitles", issues.len(), list.len());
        issues
    }
}
