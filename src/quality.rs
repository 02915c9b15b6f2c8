//! Data Quality Score: how much of the weighted evidence behind a composite
//! was actually available, with heavier penalties for critical metrics.

use crate::error::{PhiError, PhiResult};
use crate::scorer::types::{Metric, MetricScore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Critical,
    Important,
    Supporting,
    Auxiliary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    InvestmentGrade,
    Acceptable,
    Marginal,
    Low,
}

/// Any DQS `>= min_score` gets this confidence unless a higher band matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqsBand {
    pub min_score: f64,
    pub confidence: Confidence,
    pub recommendation: String,
}

impl DqsBand {
    fn new(min_score: f64, confidence: Confidence, recommendation: &str) -> Self {
        Self {
            min_score,
            confidence,
            recommendation: recommendation.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityTable {
    /// Metrics not listed count as `supporting`.
    pub criticality: BTreeMap<Metric, Criticality>,
    pub weights: BTreeMap<Criticality, f64>,
    /// Highest threshold first.
    pub bands: Vec<DqsBand>,
}

impl Default for QualityTable {
    fn default() -> Self {
        Self {
            criticality: BTreeMap::from([
                (Metric::Co2, Criticality::Critical),
                (Metric::Temperature, Criticality::Critical),
                (Metric::Humidity, Criticality::Important),
                (Metric::Light, Criticality::Supporting),
                (Metric::Pressure, Criticality::Auxiliary),
                (Metric::Ndvi, Criticality::Critical),
                (Metric::TreeCover, Criticality::Critical),
                (Metric::SoilMoisture, Criticality::Critical),
                (Metric::Aod, Criticality::Important),
                (Metric::DroughtIndex, Criticality::Important),
                (Metric::LandSurfaceTemp, Criticality::Supporting),
            ]),
            weights: BTreeMap::from([
                (Criticality::Critical, 1.0),
                (Criticality::Important, 0.7),
                (Criticality::Supporting, 0.4),
                (Criticality::Auxiliary, 0.2),
            ]),
            bands: vec![
                DqsBand::new(
                    85.0,
                    Confidence::High,
                    "High confidence results. Data quality suitable for detailed analysis and reporting.",
                ),
                DqsBand::new(
                    70.0,
                    Confidence::InvestmentGrade,
                    "Investment-grade data quality. Results suitable for most applications.",
                ),
                DqsBand::new(
                    50.0,
                    Confidence::Acceptable,
                    "Acceptable data quality. Consider supplementing with additional data sources.",
                ),
                DqsBand::new(
                    40.0,
                    Confidence::Marginal,
                    "Marginal data quality. Results should be interpreted with caution.",
                ),
                DqsBand::new(
                    0.0,
                    Confidence::Low,
                    "Low data quality. Consider adding sensors or widening the observation window.",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// 0-100, two decimals.
    pub score: f64,
    pub confidence: Confidence,
    pub recommendation: String,
    pub missing_critical: Vec<Metric>,
}

impl QualityTable {
    pub fn validate(&self) -> PhiResult<()> {
        for c in Criticality::iter() {
            match self.weights.get(&c) {
                Some(w) if w.is_finite() && *w > 0.0 => {}
                Some(w) => {
                    return Err(PhiError::Config(format!(
                        "criticality weight for '{}' must be positive (got {})",
                        c, w
                    )))
                }
                None => {
                    return Err(PhiError::Config(format!(
                        "no criticality weight for '{}'",
                        c
                    )))
                }
            }
        }
        if self.bands.is_empty() {
            return Err(PhiError::Config("DQS band table is empty".to_string()));
        }
        if self.bands.iter().any(|b| !b.min_score.is_finite()) {
            return Err(PhiError::Config(
                "DQS band thresholds must be finite".to_string(),
            ));
        }
        if self
            .bands
            .windows(2)
            .any(|w| w[0].min_score <= w[1].min_score)
        {
            return Err(PhiError::Config(
                "DQS bands must be strictly descending".to_string(),
            ));
        }
        if self.bands[self.bands.len() - 1].min_score > 0.0 {
            return Err(PhiError::Config(
                "lowest DQS band must start at or below 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn criticality_of(&self, metric: Metric) -> Criticality {
        self.criticality
            .get(&metric)
            .copied()
            .unwrap_or(Criticality::Supporting)
    }

    fn weight(&self, c: Criticality) -> f64 {
        self.weights.get(&c).copied().unwrap_or(0.0)
    }

    pub fn band(&self, score: f64) -> &DqsBand {
        self.bands
            .iter()
            .find(|b| score >= b.min_score)
            .unwrap_or(&self.bands[self.bands.len() - 1])
    }

    /// DQS = sum(w_i * a_i) / sum(w_i) * 100 over the profile's metrics,
    /// where a_i is 1 for an available reading and 0 otherwise.
    pub fn assess(&self, per_metric: &BTreeMap<Metric, Option<MetricScore>>) -> DataQuality {
        let mut weighted = 0.0;
        let mut total = 0.0;
        let mut missing_critical = Vec::new();
        for (&metric, score) in per_metric {
            let c = self.criticality_of(metric);
            let w = self.weight(c);
            total += w;
            if score.is_some() {
                weighted += w;
            } else if c == Criticality::Critical {
                missing_critical.push(metric);
            }
        }
        let score = if total > 0.0 {
            (weighted / total * 10_000.0).round() / 100.0
        } else {
            0.0
        };
        let band = self.band(score);
        DataQuality {
            score,
            confidence: band.confidence,
            recommendation: band.recommendation.clone(),
            missing_critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_thresholds() {
        let table = QualityTable::default();
        assert_eq!(table.band(85.0).confidence, Confidence::High);
        assert_eq!(table.band(84.99).confidence, Confidence::InvestmentGrade);
        assert_eq!(table.band(70.0).confidence, Confidence::InvestmentGrade);
        assert_eq!(table.band(50.0).confidence, Confidence::Acceptable);
        assert_eq!(table.band(40.0).confidence, Confidence::Marginal);
        assert_eq!(table.band(39.9).confidence, Confidence::Low);
    }

    #[test]
    fn unlisted_metric_is_supporting() {
        let mut table = QualityTable::default();
        table.criticality.remove(&Metric::Light);
        assert_eq!(table.criticality_of(Metric::Light), Criticality::Supporting);
    }

    #[test]
    fn rejects_missing_weight_and_nan_band() {
        let mut table = QualityTable::default();
        table.weights.remove(&Criticality::Auxiliary);
        assert!(table.validate().is_err());

        let mut table = QualityTable::default();
        table.bands[2].min_score = f64::NAN;
        assert!(table.validate().is_err());
    }
}
