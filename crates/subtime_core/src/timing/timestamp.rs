//! Millisecond timestamp.
//!
//! All timing values are integral milliseconds. Intermediate results may go
//! negative; operations clamp with [`Timestamp::clamp_non_negative`] before
//! writing back to a subtitle.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A point in time or a duration, in milliseconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Zero milliseconds.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Create from a millisecond count.
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Create from whole seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * 1000)
    }

    /// Millisecond count.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Value in (fractional) seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// True if below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamp negative values to zero.
    pub fn clamp_non_negative(self) -> Self {
        Self(self.0.max(0))
    }

    /// Multiply by a real factor, rounding to the nearest millisecond.
    pub fn scale(self, factor: f64) -> Self {
        Self((self.0 as f64 * factor).round() as i64)
    }

    /// `self * numerator / denominator` without intermediate overflow.
    ///
    /// Rounds toward zero. Returns `None` when `denominator` is zero.
    pub fn mul_div(self, numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let value = self.0 as i128 * numerator as i128 / denominator as i128;
        Some(Self(value as i64))
    }
}

impl fmt::Display for Timestamp {
    /// Formats as `H:MM:SS.mmm`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total_ms = self.0.unsigned_abs();
        let ms = total_ms % 1000;
        let total_secs = total_ms / 1000;
        let secs = total_secs % 60;
        let mins = (total_secs / 60) % 60;
        let hours = total_secs / 3600;
        write!(f, "{}{}:{:02}:{:02}.{:03}", sign, hours, mins, secs, ms)
    }
}

impl Add for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Timestamp) -> Timestamp {
        Timestamp(self.0 + rhs.0)
    }
}

impl AddAssign for Timestamp {
    fn add_assign(&mut self, rhs: Timestamp) {
        self.0 += rhs.0;
    }
}

impl Sub for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Timestamp) -> Timestamp {
        Timestamp(self.0 - rhs.0)
    }
}

impl SubAssign for Timestamp {
    fn sub_assign(&mut self, rhs: Timestamp) {
        self.0 -= rhs.0;
    }
}

impl Neg for Timestamp {
    type Output = Timestamp;

    fn neg(self) -> Timestamp {
        Timestamp(-self.0)
    }
}

impl Mul<i64> for Timestamp {
    type Output = Timestamp;

    fn mul(self, rhs: i64) -> Timestamp {
        Timestamp(self.0 * rhs)
    }
}

impl Div<i64> for Timestamp {
    type Output = Timestamp;

    /// Integer division, rounding toward zero.
    fn div(self, rhs: i64) -> Timestamp {
        Timestamp(self.0 / rhs)
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}
