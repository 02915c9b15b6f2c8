use crate::error::{PhiError, PhiResult};
use crate::tables::WeightProfile;
use crate::valuation::MultiplierParams;
use chrono::Duration;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Longest freshness window accepted: one year.
pub const MAX_WINDOW_MINS: i64 = 365 * 24 * 60;

fn window(mins: i64) -> Duration {
    Duration::try_minutes(mins.clamp(0, MAX_WINDOW_MINS)).unwrap_or_else(Duration::zero)
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub tuning: TuningParams,
    #[command(flatten)]
    pub site: SiteDefaults,
}

/// Scalar knobs of the engine. The reference tables hold everything else.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningParams {
    // === MULTIPLIER ===
    #[arg(long, default_value_t = 0.6)]
    pub multiplier_k: f64,
    #[arg(long, default_value_t = 0.15)]
    pub multiplier_alpha: f64,

    // === FRESHNESS ===
    #[arg(long, default_value_t = 5)]
    pub fresh_window_mins: i64,
    #[arg(long, default_value_t = 30)]
    pub stale_window_mins: i64,

    // === TREND ===
    // Score delta (points) inside which a site counts as stable
    #[arg(long, default_value_t = 2.0)]
    pub trend_tolerance: f64,

    // === PROJECTION ===
    // Ecological condition improves slower than its economic value
    #[arg(long, default_value_t = 0.3)]
    pub score_growth_damping: f64,
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            multiplier_k: 0.6,
            multiplier_alpha: 0.15,
            fresh_window_mins: 5,
            stale_window_mins: 30,
            trend_tolerance: 2.0,
            score_growth_damping: 0.3,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteDefaults {
    #[arg(long, default_value = "sensor")]
    pub profile: WeightProfile,
    #[arg(long)]
    pub ecosystem: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
}

impl TuningParams {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PhiResult<Self> {
        let content = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&content)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> PhiResult<()> {
        if !self.multiplier_k.is_finite() || !self.multiplier_alpha.is_finite() {
            return Err(PhiError::Config(
                "multiplier constants must be finite".to_string(),
            ));
        }
        if self.fresh_window_mins <= 0 || self.stale_window_mins <= self.fresh_window_mins {
            return Err(PhiError::Config(format!(
                "freshness windows must satisfy 0 < fresh ({}) < stale ({})",
                self.fresh_window_mins, self.stale_window_mins
            )));
        }
        if self.stale_window_mins > MAX_WINDOW_MINS {
            return Err(PhiError::Config(format!(
                "stale window of {} minutes exceeds the maximum of {} (one year)",
                self.stale_window_mins, MAX_WINDOW_MINS
            )));
        }
        if !(self.trend_tolerance >= 0.0) {
            return Err(PhiError::Config(format!(
                "trend tolerance must be non-negative (got {})",
                self.trend_tolerance
            )));
        }
        if !(self.score_growth_damping >= 0.0) || !self.score_growth_damping.is_finite() {
            return Err(PhiError::Config(format!(
                "score growth damping must be non-negative (got {})",
                self.score_growth_damping
            )));
        }
        Ok(())
    }

    pub fn multiplier(&self) -> MultiplierParams {
        MultiplierParams {
            k: self.multiplier_k,
            alpha: self.multiplier_alpha,
        }
    }

    /// Out-of-range values saturate at the one-year cap; `validate`
    /// rejects them before an engine is built.
    pub fn fresh_window(&self) -> Duration {
        window(self.fresh_window_mins)
    }

    pub fn stale_window(&self) -> Duration {
        window(self.stale_window_mins)
    }

    pub fn merge_from_cli(&mut self, cli: &TuningParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field;
                }
            };
        }

        update_if_present!(multiplier_k);
        update_if_present!(multiplier_alpha);
        update_if_present!(fresh_window_mins);
        update_if_present!(stale_window_mins);
        update_if_present!(trend_tolerance);
        update_if_present!(score_growth_damping);
    }
}
