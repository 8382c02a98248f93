//! Score value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounds a value to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A final submission score.
///
/// Always in `[0, 100]` and rounded to two decimal places; construction
/// through [`Score::from_raw`] enforces both. Produced exactly once per
/// task, or not at all.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// Clamps a raw value into `[0, 100]` and rounds to two decimals.
    ///
    /// Non-finite input collapses to `0.0`.
    pub fn from_raw(raw: f64) -> Self {
        let clamped = if raw.is_finite() {
            raw.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self(round2(clamped))
    }

    /// The numeric value.
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_clamps_and_rounds() {
        assert_eq!(Score::from_raw(50.005).value(), 50.01);
        assert_eq!(Score::from_raw(120.0).value(), 100.0);
        assert_eq!(Score::from_raw(-3.0).value(), 0.0);
        assert_eq!(Score::from_raw(f64::NAN).value(), 0.0);
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Score::from_raw(85.0).to_string(), "85.00");
        assert_eq!(Score::from_raw(87.5).to_string(), "87.50");
    }

    #[test]
    fn round2_behaves() {
        assert_eq!(round2(87.456), 87.46);
        assert_eq!(round2(87.454), 87.45);
    }
}
