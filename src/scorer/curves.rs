//! Response curves mapping a raw physical reading onto a 0-100 sub-score.
//!
//! Each metric picks the curve whose shape matches its health relationship:
//! accelerating harm for gas concentrations, a comfort optimum for climate
//! readings, an asymmetric band for light, and plain deviation for pressure.
//! The remote-sensing family (linear, inverse linear, sigmoid, centered)
//! covers satellite indices. Every curve clamps to `[0, 100]`.

use crate::consts::SCORE_CEILING;
use crate::error::{PhiError, PhiResult};
use serde::{Deserialize, Serialize};

/// Exponent magnitude past which the logistic is treated as saturated.
const SIGMOID_SATURATION: f64 = 700.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Curve {
    /// Linear interpolation between `(value, score)` breakpoints sorted by
    /// value. Flat before the first and after the last breakpoint.
    PiecewiseLinear { points: Vec<(f64, f64)> },

    /// `100 * exp(-0.5 * ((x - optimum) / sigma)^2)`, optionally clamping
    /// the input to `range` first.
    Gaussian {
        optimum: f64,
        sigma: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<(f64, f64)>,
    },

    /// 100 inside `[min, max]`, linear penalty per unit outside.
    Band {
        min: f64,
        max: f64,
        below_penalty: f64,
        above_penalty: f64,
    },

    /// `100 - penalty * |x - reference|`.
    Deviation { reference: f64, penalty: f64 },

    /// Higher is better over `[v_min, v_max]`.
    Linear { v_min: f64, v_max: f64 },

    /// Lower is better over `[v_min, v_max]`.
    InverseLinear { v_min: f64, v_max: f64 },

    /// Logistic centred on `v_mid` (midpoint of the range when absent).
    /// Steepness is rescaled by the range width.
    Sigmoid {
        v_min: f64,
        v_max: f64,
        k: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        v_mid: Option<f64>,
    },

    /// Best at zero, zero score at `|x| >= v_max`.
    Centered { v_max: f64 },
}

impl Curve {
    /// Score for a finite reading, always within `[0, 100]`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let raw = match self {
            Self::PiecewiseLinear { points } => piecewise(points, x),
            Self::Gaussian {
                optimum,
                sigma,
                range,
            } => {
                let x = match range {
                    Some((lo, hi)) => x.clamp(*lo, *hi),
                    None => x,
                };
                if *sigma == 0.0 {
                    if x == *optimum {
                        SCORE_CEILING
                    } else {
                        0.0
                    }
                } else {
                    let z = (x - optimum) / sigma;
                    SCORE_CEILING * (-0.5 * z * z).exp()
                }
            }
            Self::Band {
                min,
                max,
                below_penalty,
                above_penalty,
            } => {
                if x < *min {
                    SCORE_CEILING - (min - x) * below_penalty
                } else if x > *max {
                    SCORE_CEILING - (x - max) * above_penalty
                } else {
                    SCORE_CEILING
                }
            }
            Self::Deviation { reference, penalty } => {
                SCORE_CEILING - (x - reference).abs() * penalty
            }
            Self::Linear { v_min, v_max } => {
                if v_max == v_min {
                    return 50.0;
                }
                let c = x.clamp(v_min.min(*v_max), v_max.max(*v_min));
                (c - v_min) / (v_max - v_min) * SCORE_CEILING
            }
            Self::InverseLinear { v_min, v_max } => {
                if v_max == v_min {
                    return 50.0;
                }
                let c = x.clamp(v_min.min(*v_max), v_max.max(*v_min));
                (v_max - c) / (v_max - v_min) * SCORE_CEILING
            }
            Self::Sigmoid {
                v_min,
                v_max,
                k,
                v_mid,
            } => {
                let mid = v_mid.unwrap_or((v_min + v_max) / 2.0);
                let width = v_max - v_min;
                let k_scaled = if width > 0.0 { k * (10.0 / width) } else { *k };
                let exponent = -k_scaled * (x - mid);
                if exponent > SIGMOID_SATURATION {
                    0.0
                } else if exponent < -SIGMOID_SATURATION {
                    SCORE_CEILING
                } else {
                    SCORE_CEILING / (1.0 + exponent.exp())
                }
            }
            Self::Centered { v_max } => {
                if *v_max == 0.0 {
                    if x == 0.0 {
                        SCORE_CEILING
                    } else {
                        0.0
                    }
                } else {
                    SCORE_CEILING * (1.0 - x.abs() / v_max.abs())
                }
            }
        };

        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, SCORE_CEILING)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PiecewiseLinear { .. } => "piecewise_linear",
            Self::Gaussian { .. } => "gaussian",
            Self::Band { .. } => "band",
            Self::Deviation { .. } => "deviation",
            Self::Linear { .. } => "linear",
            Self::InverseLinear { .. } => "inverse_linear",
            Self::Sigmoid { .. } => "sigmoid",
            Self::Centered { .. } => "centered",
        }
    }

    /// Flat `(name, value)` view of the parameters, for score breakdowns.
    pub fn parameters(&self) -> Vec<(String, f64)> {
        let p = |name: &str, v: f64| (name.to_string(), v);
        match self {
            Self::PiecewiseLinear { points } => points
                .iter()
                .enumerate()
                .flat_map(|(i, (x, s))| [p(&format!("x{}", i), *x), p(&format!("s{}", i), *s)])
                .collect(),
            Self::Gaussian {
                optimum,
                sigma,
                range,
            } => {
                let mut out = vec![p("optimum", *optimum), p("sigma", *sigma)];
                if let Some((lo, hi)) = range {
                    out.push(p("v_min", *lo));
                    out.push(p("v_max", *hi));
                }
                out
            }
            Self::Band {
                min,
                max,
                below_penalty,
                above_penalty,
            } => vec![
                p("min", *min),
                p("max", *max),
                p("below_penalty", *below_penalty),
                p("above_penalty", *above_penalty),
            ],
            Self::Deviation { reference, penalty } => {
                vec![p("reference", *reference), p("penalty", *penalty)]
            }
            Self::Linear { v_min, v_max } | Self::InverseLinear { v_min, v_max } => {
                vec![p("v_min", *v_min), p("v_max", *v_max)]
            }
            Self::Sigmoid {
                v_min,
                v_max,
                k,
                v_mid,
            } => vec![
                p("v_min", *v_min),
                p("v_max", *v_max),
                p("k", *k),
                p("v_mid", v_mid.unwrap_or((v_min + v_max) / 2.0)),
            ],
            Self::Centered { v_max } => vec![p("v_max", *v_max)],
        }
    }

    pub fn validate(&self) -> PhiResult<()> {
        let bad = |msg: String| Err(PhiError::Config(format!("{} curve: {}", self.kind(), msg)));

        if self.parameters().iter().any(|(_, v)| !v.is_finite()) {
            return bad("parameters must be finite".to_string());
        }

        match self {
            Self::PiecewiseLinear { points } => {
                if points.len() < 2 {
                    return bad("needs at least two breakpoints".to_string());
                }
                if points.windows(2).any(|w| w[0].0 >= w[1].0) {
                    return bad("breakpoints must be strictly ascending".to_string());
                }
            }
            Self::Gaussian { sigma, range, .. } => {
                if *sigma < 0.0 {
                    return bad(format!("sigma must be non-negative (got {})", sigma));
                }
                if let Some((lo, hi)) = range {
                    if lo > hi {
                        return bad(format!("range {}..{} is inverted", lo, hi));
                    }
                }
            }
            Self::Band {
                min,
                max,
                below_penalty,
                above_penalty,
            } => {
                if min > max {
                    return bad(format!("band {}..{} is inverted", min, max));
                }
                if *below_penalty < 0.0 || *above_penalty < 0.0 {
                    return bad("penalties must be non-negative".to_string());
                }
            }
            Self::Deviation { penalty, .. } => {
                if *penalty < 0.0 {
                    return bad("penalty must be non-negative".to_string());
                }
            }
            Self::Linear { .. }
            | Self::InverseLinear { .. }
            | Self::Sigmoid { .. }
            | Self::Centered { .. } => {}
        }
        Ok(())
    }
}

fn piecewise(points: &[(f64, f64)], x: f64) -> f64 {
    let (first_x, first_s) = points[0];
    if x <= first_x {
        return first_s;
    }
    for w in points.windows(2) {
        let (x0, s0) = w[0];
        let (x1, s1) = w[1];
        if x <= x1 {
            return s0 + (x - x0) / (x1 - x0) * (s1 - s0);
        }
    }
    points[points.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn co2() -> Curve {
        Curve::PiecewiseLinear {
            points: vec![
                (400.0, 100.0),
                (700.0, 92.0),
                (1000.0, 80.0),
                (1500.0, 55.0),
                (2500.0, 0.0),
            ],
        }
    }

    #[test]
    fn piecewise_interpolates_and_flattens() {
        let c = co2();
        assert_eq!(c.evaluate(300.0), 100.0);
        assert_eq!(c.evaluate(400.0), 100.0);
        assert_eq!(c.evaluate(1000.0), 80.0);
        assert!((c.evaluate(850.0) - 86.0).abs() < 1e-9);
        assert_eq!(c.evaluate(10_000.0), 0.0);
    }

    #[test]
    fn gaussian_is_symmetric() {
        let c = Curve::Gaussian {
            optimum: 22.0,
            sigma: 5.0,
            range: None,
        };
        assert_eq!(c.evaluate(22.0), 100.0);
        assert_eq!(c.evaluate(17.0), c.evaluate(27.0));
        assert!((c.evaluate(27.0) - 100.0 * (-0.5f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn band_penalises_dim_harder_than_bright() {
        let c = Curve::Band {
            min: 300.0,
            max: 1000.0,
            below_penalty: 1.0 / 3.0,
            above_penalty: 0.005,
        };
        assert_eq!(c.evaluate(650.0), 100.0);
        let dim = c.evaluate(200.0);
        let bright = c.evaluate(1100.0);
        assert!(dim < bright, "dim {} bright {}", dim, bright);
        assert_eq!(c.evaluate(0.0), 0.0);
    }

    #[test]
    fn sigmoid_saturates_without_overflow() {
        let c = Curve::Sigmoid {
            v_min: 0.0,
            v_max: 100.0,
            k: 0.5,
            v_mid: Some(40.0),
        };
        assert_eq!(c.evaluate(40.0), 50.0);
        assert_eq!(c.evaluate(1e12), 100.0);
        assert_eq!(c.evaluate(-1e12), 0.0);
    }

    #[test]
    fn degenerate_linear_range_is_neutral() {
        let c = Curve::Linear {
            v_min: 1.0,
            v_max: 1.0,
        };
        assert_eq!(c.evaluate(7.0), 50.0);
    }

    #[test]
    fn validation_rejects_unsorted_breakpoints() {
        let c = Curve::PiecewiseLinear {
            points: vec![(10.0, 100.0), (5.0, 0.0)],
        };
        assert!(c.validate().is_err());
        assert!(co2().validate().is_ok());
    }

    #[test]
    fn curve_json_is_tagged_by_kind() {
        let json = r#"{"kind":"deviation","reference":1013.25,"penalty":2.0}"#;
        let c: Curve = serde_json::from_str(json).unwrap();
        assert_eq!(c.evaluate(1013.25), 100.0);
        assert_eq!(c.kind(), "deviation");
    }
}
