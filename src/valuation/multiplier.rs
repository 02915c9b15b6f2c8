use crate::consts::{MULTIPLIER_CEILING, MULTIPLIER_FLOOR, MULTIPLIER_PIVOT};
use serde::{Deserialize, Serialize};

/// Sensitivity constants of the PHI-to-ESV multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierParams {
    /// Base sensitivity.
    pub k: f64,
    /// Logarithmic acceleration.
    pub alpha: f64,
}

impl Default for MultiplierParams {
    fn default() -> Self {
        Self { k: 0.6, alpha: 0.15 }
    }
}

/// `m = ((s - 50) / 100) * k * (1 + alpha * ln(s / 50))`, clamped to
/// `[-0.30, 0.50]` and rounded to 4 decimals.
///
/// Scores `<= 0` (and NaN) short-circuit to the floor. Positive scores
/// below 1 are evaluated at 1 so the logarithm cannot flip the sign.
pub fn phi_multiplier(score: f64, params: &MultiplierParams) -> f64 {
    if score.is_nan() || score <= 0.0 {
        return MULTIPLIER_FLOOR;
    }
    let s = score.max(1.0);
    let base = (s - MULTIPLIER_PIVOT) / 100.0;
    let log_factor = 1.0 + params.alpha * (s / MULTIPLIER_PIVOT).ln();
    let raw = base * params.k * log_factor;

    let clamped = if raw.is_nan() {
        MULTIPLIER_FLOOR
    } else {
        raw.clamp(MULTIPLIER_FLOOR, MULTIPLIER_CEILING)
    };
    (clamped * 10_000.0).round() / 10_000.0
}
