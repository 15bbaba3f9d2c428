//! Bounded confidence score.

use serde::{Deserialize, Serialize};

/// A confidence score that always lies within `[0, 1]`.
///
/// Out-of-range input is clamped rather than rejected, and `NaN` becomes
/// `0.0`. Deserialization goes through the same clamp, so a misbehaving
/// generation service can never place an out-of-range value into a plan.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Lowest possible confidence.
    pub const MIN: Confidence = Confidence(0.0);

    /// Highest possible confidence.
    pub const MAX: Confidence = Confidence(1.0);

    /// Creates a confidence score, clamping into `[0, 1]`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::MIN
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Returns the raw score.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the score as a whole percentage, rounded half away from zero.
    pub fn percent(self) -> u8 {
        // Clamped to [0, 1] so the cast cannot truncate.
        (self.0 * 100.0).round() as u8
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}
