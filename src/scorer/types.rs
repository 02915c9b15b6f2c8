use crate::quality::DataQuality;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    // Sensor (gas / climate)
    Co2,
    Temperature,
    Humidity,
    Light,
    Pressure,

    // Remote sensing
    Ndvi,
    Aod,
    LandSurfaceTemp,
    SoilMoisture,
    DroughtIndex,
    TreeCover,
}

/// Thematic group of a metric. Ecosystem-adaptive weighting scales whole
/// pillars rather than single metrics.
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
pub enum Pillar {
    /// Air quality and atmospheric conditions.
    Atmospheric,
    /// Vegetation health.
    Biodiversity,
    /// Forest cover and carbon storage.
    Carbon,
    /// Land and water stress.
    Degradation,
}

impl Metric {
    pub fn pillar(&self) -> Pillar {
        match self {
            Self::Co2 | Self::Temperature | Self::Humidity | Self::Light | Self::Pressure => {
                Pillar::Atmospheric
            }
            Self::Aod => Pillar::Atmospheric,
            Self::Ndvi => Pillar::Biodiversity,
            Self::TreeCover => Pillar::Carbon,
            Self::LandSurfaceTemp | Self::SoilMoisture | Self::DroughtIndex => Pillar::Degradation,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Co2 => "ppm",
            Self::Temperature | Self::LandSurfaceTemp => "°C",
            Self::Humidity | Self::TreeCover => "%",
            Self::Light => "lux",
            Self::Pressure => "hPa",
            Self::SoilMoisture => "m³/m³",
            Self::Ndvi | Self::Aod | Self::DroughtIndex => "index",
        }
    }
}

/// One raw reading. `None` and non-finite values mean "not available";
/// a literal `0.0` is a real reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric: Metric,
    pub value: Option<f64>,
}

impl MetricSample {
    pub fn new(metric: Metric, value: f64) -> Self {
        Self {
            metric,
            value: Some(value),
        }
    }

    pub fn missing(metric: Metric) -> Self {
        Self {
            metric,
            value: None,
        }
    }

    /// The reading if it can be scored.
    pub fn usable_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScore {
    pub metric: Metric,
    pub raw_value: f64,
    pub score: f64,
    pub grade: String,
    pub label: String,
    pub unit: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Fresh,
    Stale,
    Expired,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    Unknown,
}

/// A set of readings from one site, with the optional context used for
/// freshness and trend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Observation {
    pub samples: Vec<MetricSample>,
    pub observed_at: Option<DateTime<Utc>>,
    pub previous_score: Option<f64>,
}

impl Observation {
    pub fn new(samples: Vec<MetricSample>) -> Self {
        Self {
            samples,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScore {
    pub overall_score: f64,
    pub grade: String,
    pub label: String,
    pub color: String,
    /// Every metric of the active weight profile; `None` when not available.
    pub per_metric: BTreeMap<Metric, Option<MetricScore>>,
    pub available_count: usize,
    pub total_count: usize,
    pub is_partial: bool,
    pub missing_metrics: Vec<Metric>,
    pub trend: Trend,
    pub data_freshness: Freshness,
    /// Ecosystem whose pillar weights were applied.
    pub weighting: String,
    pub data_quality: DataQuality,
}

impl CompositeScore {
    pub fn is_empty(&self) -> bool {
        self.available_count == 0
    }

    pub fn available(&self) -> impl Iterator<Item = &MetricScore> {
        self.per_metric.values().filter_map(|s| s.as_ref())
    }
}
