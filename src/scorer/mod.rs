pub mod composite;
pub mod curves;
pub mod types;

pub use self::curves::Curve;
pub use self::types::{
    CompositeScore, Freshness, Metric, MetricSample, MetricScore, Observation, Trend,
};

use crate::config::TuningParams;
use crate::error::PhiResult;
use crate::grading::{GradeBand, GradeTable};
use crate::tables::{ReferenceTables, WeightProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Metric Normalizer and Composite Aggregator over one weight profile.
#[derive(Debug, Clone)]
pub struct Scorer {
    tables: Arc<ReferenceTables>,
    profile: WeightProfile,
    weights: BTreeMap<Metric, f64>,
    tuning: TuningParams,
}

/// How a single reading was scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBreakdown {
    pub metric: Metric,
    pub raw_value: Option<f64>,
    pub score: Option<MetricScore>,
    pub curve: String,
    pub parameters: Vec<(String, f64)>,
    /// Weight in the active profile; `None` when the metric is not part of it.
    pub weight: Option<f64>,
    pub unit: String,
}

impl Scorer {
    /// `tables` must already be validated (see `ReferenceTables::validate`).
    pub fn new(
        tables: Arc<ReferenceTables>,
        profile: WeightProfile,
        tuning: TuningParams,
    ) -> PhiResult<Self> {
        let weights = tables.profile_weights(profile)?.clone();
        Ok(Self {
            tables,
            profile,
            weights,
            tuning,
        })
    }

    pub fn profile(&self) -> WeightProfile {
        self.profile
    }

    pub fn weights(&self) -> &BTreeMap<Metric, f64> {
        &self.weights
    }

    pub fn grades(&self) -> &GradeTable {
        &self.tables.grades
    }

    pub fn grade(&self, score: f64) -> &GradeBand {
        self.tables.grades.resolve(score)
    }

    fn curve(&self, metric: Metric) -> &Curve {
        self.tables
            .curves
            .get(&metric)
            .unwrap_or_else(|| panic!("no response curve registered for metric '{}'", metric))
    }

    /// Scores one reading. `None` for NaN or infinite values.
    ///
    /// # Panics
    /// If no curve is registered for `metric`.
    pub fn normalize(&self, metric: Metric, value: f64) -> Option<MetricScore> {
        let curve = self.curve(metric);
        if !value.is_finite() {
            return None;
        }
        let score = composite::round1(curve.evaluate(value));
        let band = self.grade(score);
        Some(MetricScore {
            metric,
            raw_value: value,
            score,
            grade: band.grade.clone(),
            label: band.label.clone(),
            unit: metric.unit().to_string(),
            color: band.color.clone(),
        })
    }

    /// Profile weights scaled by the ecosystem's pillar weights.
    pub fn weights_for(&self, ecosystem: Option<&str>) -> (&str, BTreeMap<Metric, f64>) {
        let (key, pillars) = self.tables.pillar_weights_for(ecosystem);
        let weights = self
            .weights
            .iter()
            .map(|(&m, &w)| (m, w * pillars.get(&m.pillar()).copied().unwrap_or(1.0)))
            .collect();
        (key, weights)
    }

    /// Composite over the readings with default pillar weighting, without
    /// freshness or trend context.
    pub fn aggregate(&self, samples: &[MetricSample]) -> CompositeScore {
        self.aggregate_for(samples, None)
    }

    /// Composite with the pillar weights of `ecosystem`.
    pub fn aggregate_for(
        &self,
        samples: &[MetricSample],
        ecosystem: Option<&str>,
    ) -> CompositeScore {
        let readings = composite::collapse_samples(samples);

        for metric in readings.keys() {
            if !self.weights.contains_key(metric) {
                debug!(
                    "Ignoring {} reading: not part of the '{}' profile",
                    metric, self.profile
                );
            }
        }

        let per_metric: BTreeMap<Metric, Option<MetricScore>> = self
            .weights
            .keys()
            .map(|&metric| {
                let score = readings
                    .get(&metric)
                    .and_then(|&v| self.normalize(metric, v));
                (metric, score)
            })
            .collect();

        let (weighting, weights) = self.weights_for(ecosystem);
        composite::assemble(
            per_metric,
            &weights,
            &self.tables.grades,
            &self.tables.quality,
            weighting,
        )
    }

    /// Composite with freshness measured against `now` and trend against
    /// the caller's previous score.
    pub fn aggregate_observation(&self, obs: &Observation, now: DateTime<Utc>) -> CompositeScore {
        self.aggregate_observation_for(obs, None, now)
    }

    pub fn aggregate_observation_for(
        &self,
        obs: &Observation,
        ecosystem: Option<&str>,
        now: DateTime<Utc>,
    ) -> CompositeScore {
        let mut result = self.aggregate_for(&obs.samples, ecosystem);
        result.data_freshness = composite::freshness(
            obs.observed_at,
            now,
            self.tuning.fresh_window(),
            self.tuning.stale_window(),
        );
        if !result.is_empty() {
            result.trend = composite::trend(
                result.overall_score,
                obs.previous_score,
                self.tuning.trend_tolerance,
            );
        }
        result
    }

    pub fn explain(&self, metric: Metric, value: f64) -> MetricBreakdown {
        let curve = self.curve(metric);
        MetricBreakdown {
            metric,
            raw_value: Some(value).filter(|v| v.is_finite()),
            score: self.normalize(metric, value),
            curve: curve.kind().to_string(),
            parameters: curve.parameters(),
            weight: self.weights.get(&metric).copied(),
            unit: metric.unit().to_string(),
        }
    }
}
