use super::types::{CompositeScore, Freshness, Metric, MetricSample, MetricScore, Trend};
use crate::grading::GradeTable;
use crate::quality::QualityTable;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::debug;

pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Usable readings per metric. Duplicates are averaged over their sorted
/// values so the result does not depend on sample order.
pub fn collapse_samples(samples: &[MetricSample]) -> BTreeMap<Metric, f64> {
    let mut buckets: BTreeMap<Metric, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        match sample.usable_value() {
            Some(v) => buckets.entry(sample.metric).or_default().push(v),
            None => debug!("Dropping unusable {} reading {:?}", sample.metric, sample.value),
        }
    }
    buckets
        .into_iter()
        .map(|(metric, mut values)| {
            if values.len() == 1 {
                return (metric, values[0]);
            }
            values.sort_by(f64::total_cmp);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (metric, mean)
        })
        .collect()
}

/// Weighted mean over the available metrics only. Weights of missing
/// metrics leave both numerator and denominator.
pub fn weighted_mean(
    per_metric: &BTreeMap<Metric, Option<MetricScore>>,
    weights: &BTreeMap<Metric, f64>,
) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (metric, score) in per_metric {
        if let (Some(s), Some(w)) = (score, weights.get(metric)) {
            weighted_sum += s.score * w;
            total_weight += w;
        }
    }
    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

pub fn assemble(
    per_metric: BTreeMap<Metric, Option<MetricScore>>,
    weights: &BTreeMap<Metric, f64>,
    grades: &GradeTable,
    quality: &QualityTable,
    weighting: &str,
) -> CompositeScore {
    let total_count = per_metric.len();
    let missing_metrics: Vec<Metric> = per_metric
        .iter()
        .filter(|(_, s)| s.is_none())
        .map(|(m, _)| *m)
        .collect();
    let available_count = total_count - missing_metrics.len();

    let overall_score = weighted_mean(&per_metric, weights)
        .map(round1)
        .unwrap_or(0.0);
    let band = if available_count == 0 {
        grades.worst()
    } else {
        grades.resolve(overall_score)
    };

    if !missing_metrics.is_empty() {
        debug!(
            "Partial composite: {}/{} metrics, missing {:?}",
            available_count, total_count, missing_metrics
        );
    }

    let data_quality = quality.assess(&per_metric);

    CompositeScore {
        overall_score,
        grade: band.grade.clone(),
        label: band.label.clone(),
        color: band.color.clone(),
        per_metric,
        available_count,
        total_count,
        is_partial: available_count < total_count,
        missing_metrics,
        trend: Trend::Unknown,
        data_freshness: Freshness::None,
        weighting: weighting.to_string(),
        data_quality,
    }
}

/// Age of the newest reading against `now`. Timestamps in the future count
/// as zero age.
pub fn freshness(
    observed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    fresh_window: Duration,
    stale_window: Duration,
) -> Freshness {
    let Some(observed) = observed_at else {
        return Freshness::None;
    };
    let age = (now - observed).max(Duration::zero());
    if age < fresh_window {
        Freshness::Fresh
    } else if age < stale_window {
        Freshness::Stale
    } else {
        Freshness::Expired
    }
}

pub fn trend(current: f64, previous: Option<f64>, tolerance: f64) -> Trend {
    match previous.filter(|p| p.is_finite()) {
        None => Trend::Unknown,
        Some(prev) => {
            let delta = current - prev;
            if delta > tolerance {
                Trend::Improving
            } else if delta < -tolerance {
                Trend::Declining
            } else {
                Trend::Stable
            }
        }
    }
}
