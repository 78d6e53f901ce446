//! Scale subtitles between two anchor points.
//!
//! Two anchor subtitles are moved to new start times; every other time in
//! the range follows the same affine mapping. Used to fix drift from a
//! frame rate mismatch.

use serde::{Deserialize, Serialize};

use crate::timing::error::TimingRefusal;
use crate::timing::timestamp::Timestamp;
use crate::timing::types::SubtitleList;
use crate::timing::{TimingEngine, TimingOutcome, TimingResult};

use super::TimePlan;

/// Which subtitles the mapping applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleRange {
    /// From the first anchor to the last anchor, inclusive.
    #[default]
    Anchors,
    /// The whole document.
    Document,
}

impl TimingEngine {
    /// Map the start of subtitle `first_num` to `first_dest` and the start
    /// of subtitle `last_num` to `last_dest`, interpolating every start and
    /// end in `range`.
    ///
    /// Source points are the anchors' current starts, so repeating the call
    /// with the same destinations changes nothing.
    pub fn scale(
        &self,
        list: &mut SubtitleList,
        first_num: usize,
        first_dest: Timestamp,
        last_num: usize,
        last_dest: Timestamp,
        range: ScaleRange,
    ) -> TimingResult {
        self.finish(
            "Scale",
            self.apply_scale(list, first_num, first_dest, last_num, last_dest, range),
        )
    }

    fn apply_scale(
        &self,
        list: &mut SubtitleList,
        first_num: usize,
        first_dest: Timestamp,
        last_num: usize,
        last_dest: Timestamp,
        range: ScaleRange,
    ) -> TimingResult {
        if first_num >= last_num {
            return Err(TimingRefusal::invalid_anchors(format!(
                "first subtitle ({}) must come before last subtitle ({})",
                first_num, last_num
            )));
        }
        let first = list.index_of_num(first_num).ok_or_else(|| {
            TimingRefusal::invalid_anchors(format!("subtitle {} does not exist", first_num))
        })?;
        let last = list.index_of_num(last_num).ok_or_else(|| {
            TimingRefusal::invalid_anchors(format!("subtitle {} does not exist", last_num))
        })?;

        let source1 = list[first].start;
        let source2 = list[last].start;
        let separation = source2 - source1;
        if separation == Timestamp::ZERO {
            return Err(TimingRefusal::invalid_anchors(
                "both anchors start at the same time",
            ));
        }

        let offset = first_dest - source1;
        let scale = ((last_dest - source2) - offset).as_millis() as f64
            / separation.as_millis() as f64;

        tracing::debug!(
            "Scale: #{} {} -> {}, #{} {} -> {}, factor {:+.6}",
            first_num,
            source1,
            first_dest,
            last_num,
            source2,
            last_dest,
            scale
        );

        let map = |time: Timestamp| time + (time - source1).scale(scale) + offset;

        let (from, to) = match range {
            ScaleRange::Anchors => (first, last),
            ScaleRange::Document => (0, list.len() - 1),
        };

        let mut plan = TimePlan::new();
        for index in from..=to {
            let subtitle = &list[index];
            plan.push(index, map(subtitle.start), map(subtitle.end));
        }

        let affected = plan.apply(list);
        Ok(TimingOutcome::new(
            affected,
            format!("{} subtitles scaled", affected),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::Subtitle;

    fn list() -> SubtitleList {
        [
            Subtitle::from_millis(1000, 2000, "one"),
            Subtitle::from_millis(5000, 6000, "two"),
            Subtitle::from_millis(11000, 12500, "three"),
            Subtitle::from_millis(20000, 21000, "four"),
        ]
        .into_iter()
        .collect()
    }

    fn ms(value: i64) -> Timestamp {
        Timestamp::from_millis(value)
    }

    #[test]
    fn anchors_land_exactly_on_destinations() {
        let mut list = list();
        TimingEngine::default()
            .scale(&mut list, 1, ms(1500), 3, ms(13000), ScaleRange::Anchors)
            .unwrap();

        assert_eq!(list[0].start, ms(1500));
        assert_eq!(list[2].start, ms(13000));
    }

    #[test]
    fn interior_times_are_interpolated() {
        let mut list = list();
        // Stretch by 10% around subtitle 1.
        TimingEngine::default()
            .scale(&mut list, 1, ms(1000), 3, ms(12000), ScaleRange::Anchors)
            .unwrap();

        assert_eq!(list[0].end, ms(2100));
        assert_eq!(list[1].start, ms(5400));
        assert_eq!(list[1].end, ms(6500));
        assert_eq!(list[2].end, ms(13650));
        // Outside the anchor span
        assert_eq!(list[3].start, ms(20000));
    }

    #[test]
    fn document_range_extrapolates() {
        let mut list = list();
        TimingEngine::default()
            .scale(&mut list, 2, ms(5000), 3, ms(11600), ScaleRange::Document)
            .unwrap();

        // Factor 0.1 around 5000
        assert_eq!(list[0].start, ms(600));
        assert_eq!(list[3].start, ms(21500));
    }

    #[test]
    fn extrapolation_clamps_at_zero() {
        let mut list = list();
        TimingEngine::default()
            .scale(&mut list, 2, ms(0), 3, ms(6000), ScaleRange::Document)
            .unwrap();
        assert_eq!(list[0].start, Timestamp::ZERO);
        assert_eq!(list[1].start, Timestamp::ZERO);
    }

    #[test]
    fn scaling_again_is_a_fixed_point() {
        let mut list = list();
        let engine = TimingEngine::default();
        engine
            .scale(&mut list, 1, ms(1200), 4, ms(23000), ScaleRange::Anchors)
            .unwrap();
        let once = list.clone();

        let outcome = engine
            .scale(&mut list, 1, ms(1200), 4, ms(23000), ScaleRange::Anchors)
            .unwrap();

        assert_eq!(list, once);
        assert_eq!(outcome.affected, 0);
    }

    #[test]
    fn refuses_bad_anchors() {
        let mut list = list();
        let original = list.clone();
        let engine = TimingEngine::default();

        for (first, last) in [(2, 2), (3, 1), (1, 9), (0, 2)] {
            let result = engine.scale(&mut list, first, ms(0), last, ms(1000), ScaleRange::Anchors);
            assert!(
                matches!(result, Err(TimingRefusal::InvalidAnchors(_))),
                "anchors {} / {}",
                first,
                last
            );
        }
        assert_eq!(list, original);
    }

    #[test]
    fn refuses_anchors_with_same_start() {
        let mut list: SubtitleList = [
            Subtitle::from_millis(1000, 2000, "one"),
            Subtitle::from_millis(1000, 2500, "two"),
        ]
        .into_iter()
        .collect();
        let result =
            TimingEngine::default().scale(&mut list, 1, ms(0), 2, ms(500), ScaleRange::Anchors);
        assert!(matches!(result, Err(TimingRefusal::InvalidAnchors(_))));
    }
}
