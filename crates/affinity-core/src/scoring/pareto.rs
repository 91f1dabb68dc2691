//! Pareto-style saturation curve.

use serde::{Deserialize, Serialize};

/// Saturating curve that reaches 80% of `xmax` at `x80`.
///
/// Returns `0` below `x0`, otherwise `xmax * (1 - exp(-ln(5) / x80 * x))`.
/// The curve is non-decreasing in `x` and bounded by `xmax`.
#[must_use]
pub fn pareto(x0: f64, x80: f64, xmax: f64, x: f64) -> f64 {
    if x < x0 {
        return 0.0;
    }
    xmax * (1.0 - (-5.0_f64.ln() / x80 * x).exp())
}

/// The two thresholds of a [`pareto`] curve starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParetoThresholds {
    /// Input at which the curve reaches 80% of its maximum.
    pub eighty_percent: f64,
    /// Maximum output of the curve.
    pub maximum: f64,
}

impl ParetoThresholds {
    /// Creates thresholds.
    #[must_use]
    pub const fn new(eighty_percent: f64, maximum: f64) -> Self {
        Self {
            eighty_percent,
            maximum,
        }
    }

    /// Evaluates the curve at `x`, normalised to `[0, 1]`.
    #[must_use]
    pub fn normalized(&self, x: f64) -> f64 {
        pareto(0.0, self.eighty_percent, self.maximum, x) / self.maximum
    }
}
