//! Timing policy.
//!
//! Read-only limits handed to the engine for the duration of an operation.
//! Built from [`crate::config::TimingSettings`] or directly by the host.

use serde::Serialize;

use super::error::TimingRefusal;
use super::timestamp::Timestamp;

/// Gap, display and reading speed limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingPolicy {
    min_gap: Timestamp,
    min_display: Timestamp,
    min_cps: f64,
    max_cps: f64,
    ideal_cps: f64,
}

impl TimingPolicy {
    /// Create a validated policy.
    ///
    /// Every characters-per-second value must be positive and finite, gap
    /// and display must be non-negative and `min_cps <= max_cps`.
    pub fn new(
        min_gap: Timestamp,
        min_display: Timestamp,
        min_cps: f64,
        max_cps: f64,
        ideal_cps: f64,
    ) -> Result<Self, TimingRefusal> {
        if min_gap.is_negative() {
            return Err(TimingRefusal::invalid_policy(format!(
                "minimum gap is negative ({}ms)",
                min_gap.as_millis()
            )));
        }
        if min_display.is_negative() {
            return Err(TimingRefusal::invalid_policy(format!(
                "minimum display is negative ({}ms)",
                min_display.as_millis()
            )));
        }
        for (name, value) in [("minimum", min_cps), ("maximum", max_cps), ("ideal", ideal_cps)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TimingRefusal::invalid_policy(format!(
                    "{} characters per second must be greater than zero (got {})",
                    name, value
                )));
            }
        }
        if min_cps > max_cps {
            return Err(TimingRefusal::invalid_policy(format!(
                "minimum characters per second ({}) exceeds maximum ({})",
                min_cps, max_cps
            )));
        }

        Ok(Self {
            min_gap,
            min_display,
            min_cps,
            max_cps,
            ideal_cps,
        })
    }

    /// Minimum gap between adjacent subtitles.
    pub fn min_gap(&self) -> Timestamp {
        self.min_gap
    }

    /// Minimum display duration.
    pub fn min_display(&self) -> Timestamp {
        self.min_display
    }

    /// Slowest acceptable reading speed.
    pub fn min_cps(&self) -> f64 {
        self.min_cps
    }

    /// Fastest acceptable reading speed.
    pub fn max_cps(&self) -> f64 {
        self.max_cps
    }

    /// Comfortable reading speed.
    pub fn ideal_cps(&self) -> f64 {
        self.ideal_cps
    }

    /// Return a copy with a different gap.
    pub fn with_min_gap(self, min_gap: Timestamp) -> Result<Self, TimingRefusal> {
        Self::new(
            min_gap,
            self.min_display,
            self.min_cps,
            self.max_cps,
            self.ideal_cps,
        )
    }
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            min_gap: Timestamp::from_millis(100),
            min_display: Timestamp::from_millis(1000),
            min_cps: 5.0,
            max_cps: 25.0,
            ideal_cps: 15.0,
        }
    }
}

/// Display duration needed to read `chars` characters at `cps`.
///
/// `floor(1000 * chars / cps)` milliseconds. Refuses a non-positive cps.
pub fn duration_for_chars(chars: u64, cps: f64) -> Result<Timestamp, TimingRefusal> {
    if !(cps.is_finite() && cps > 0.0) {
        return Err(TimingRefusal::InvalidCps(cps));
    }
    Ok(Timestamp::from_millis(
        (1000.0 * chars as f64 / cps).floor() as i64,
    ))
}

/// Reading speed of `chars` characters shown for `duration`.
///
/// `None` when the duration is not positive.
pub fn chars_per_second(chars: u64, duration: Timestamp) -> Option<f64> {
    (duration.as_millis() > 0).then(|| chars as f64 / duration.as_secs_f64())
}
