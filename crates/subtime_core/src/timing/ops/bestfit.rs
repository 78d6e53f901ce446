//! Best-fit distribution.
//!
//! Spreads a contiguous run over the time between its first start and last
//! end, proportionally to each subtitle's text weight.
//!
//! Starts are placed on the *gross* span (`last.end - first.start`) while
//! durations share the *net* span (gross minus one gap per boundary), capped
//! by the slowest reading speed. Starts therefore stay evenly spread even
//! when durations get compressed.

use crate::timing::error::TimingRefusal;
use crate::timing::policy::duration_for_chars;
use crate::timing::selection::Selection;
use crate::timing::timestamp::Timestamp;
use crate::timing::types::SubtitleList;
use crate::timing::{TimingEngine, TimingOutcome, TimingResult};

use super::TimePlan;

impl TimingEngine {
    /// Redistribute each contiguous run (2 or more subtitles) of the
    /// selection.
    ///
    /// The first start and last end of every run are preserved. Refuses when
    /// no run is long enough, when a run has no text, or when the gaps alone
    /// consume a run's span.
    pub fn best_fit(&self, list: &mut SubtitleList, selection: &Selection) -> TimingResult {
        self.finish("Best fit", self.apply_best_fit(list, selection))
    }

    fn apply_best_fit(&self, list: &mut SubtitleList, selection: &Selection) -> TimingResult {
        let runs = selection.runs_of_at_least(list, 2)?;

        let mut plan = TimePlan::new();
        for run in &runs {
            self.plan_best_fit(list, run, &mut plan)?;
        }

        let affected = plan.apply(list);
        Ok(TimingOutcome::new(
            affected,
            format!(
                "{} subtitles redistributed in {} run(s)",
                affected,
                runs.len()
            ),
        ))
    }

    fn plan_best_fit(
        &self,
        list: &SubtitleList,
        run: &[usize],
        plan: &mut TimePlan,
    ) -> Result<(), TimingRefusal> {
        let gap = self.policy.min_gap();
        let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
            return Ok(());
        };

        let start = list[first].start;
        let end = list[last].end;
        let gross = end - start;
        let net = gross - gap * (run.len() as i64 - 1);

        let weights: Vec<u64> = run.iter().map(|&i| self.weight(&list[i].text)).collect();
        let total: u64 = weights.iter().sum();
        if total == 0 {
            return Err(TimingRefusal::ZeroWeight);
        }
        if net <= Timestamp::ZERO {
            return Err(TimingRefusal::NotEnoughTime { start, end });
        }

        tracing::debug!(
            "Best fit run {}-{}: gross {}ms, net {}ms, {} chars",
            list[first].num,
            list[last].num,
            gross.as_millis(),
            net.as_millis(),
            total
        );

        let mut prev_chars: u64 = 0;
        let mut prev_end = start;
        let run_start = plan.len();

        for (pos, (&index, &chars)) in run.iter().zip(&weights).enumerate() {
            let share = net.mul_div(chars, total).ok_or(TimingRefusal::ZeroWeight)?;
            let max_duration = duration_for_chars(chars, self.policy.min_cps())?;
            let duration = share.min(max_duration);

            let offset = gross
                .mul_div(prev_chars, total)
                .ok_or(TimingRefusal::ZeroWeight)?;
            let mut in_time = start + offset;
            if pos > 0 && in_time - prev_end < gap {
                in_time = prev_end + gap;
            }
            let out_time = in_time + duration;

            tracing::trace!(
                "  #{}: {} chars, share {}ms, cap {}ms -> [{}, {}]",
                list[index].num,
                chars,
                share.as_millis(),
                max_duration.as_millis(),
                in_time,
                out_time
            );

            plan.push(index, in_time, out_time);
            prev_end = out_time;
            prev_chars += chars;
        }

        // Rounding drift must not move the run's outer boundary.
        if plan.len() > run_start {
            plan.set_last_end(end);
        }

        Ok(())
    }
}
