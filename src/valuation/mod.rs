//! Ecosystem Service Value (ESV) estimation.
//!
//! The health score moves a per-hectare baseline through the PHI
//! multiplier and a regional factor. Service percentages are computed from
//! the unadjusted values, so they describe the ecosystem's composition and
//! do not move with the adjustment.

pub mod baselines;
pub mod multiplier;

pub use self::multiplier::{phi_multiplier, MultiplierParams};

use crate::consts::UNAVAILABLE_COLOR;
use crate::tables::{ReferenceTables, ServiceInfo};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceValue {
    pub key: String,
    pub name: String,
    pub icon: String,
    /// Adjusted USD/ha/yr.
    pub value: f64,
    /// Share of the unadjusted total, rounded to a whole percent.
    pub percentage: u32,
    pub color: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsvBreakdown {
    /// Sum of the unadjusted service values.
    pub total_value: f64,
    pub adjusted_value: f64,
    pub phi_multiplier: f64,
    pub regional_factor: f64,
    /// Resolved ecosystem key (`default` when the requested type is unknown).
    pub ecosystem_type: String,
    /// Sorted by adjusted value, highest first.
    pub services: Vec<ServiceValue>,
    pub baseline_value: f64,
}

impl EsvBreakdown {
    pub fn percentage_total(&self) -> u32 {
        self.services.iter().map(|s| s.percentage).sum()
    }
}

/// Value an ecosystem at the given health score.
pub fn valuate(
    tables: &ReferenceTables,
    params: &MultiplierParams,
    score: f64,
    ecosystem: Option<&str>,
    region: Option<&str>,
) -> EsvBreakdown {
    let (eco_key, baseline) = tables.ecosystem(ecosystem);
    let regional_factor = tables.regional_factor(region);
    let m = phi_multiplier(score, params);
    let adjustment = (1.0 + m) * regional_factor;

    let raw_total: f64 = baseline.services.values().sum();

    let mut services: Vec<ServiceValue> = baseline
        .services
        .iter()
        .map(|(key, raw)| {
            let percentage = if raw_total > 0.0 {
                (raw / raw_total * 100.0).round() as u32
            } else {
                0
            };
            let info = tables
                .services
                .get(key)
                .cloned()
                .unwrap_or_else(|| fallback_info(key));
            ServiceValue {
                key: key.clone(),
                name: info.name,
                icon: info.icon,
                value: raw * adjustment,
                percentage,
                color: info.color,
                description: info.description,
            }
        })
        .collect();

    services.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });

    let adjusted_value = raw_total * adjustment;
    debug!(
        "ESV {}: base {:.0} x (1 {:+.4}) x {:.2} = {:.0}",
        eco_key, raw_total, m, regional_factor, adjusted_value
    );

    EsvBreakdown {
        total_value: raw_total,
        adjusted_value,
        phi_multiplier: m,
        regional_factor,
        ecosystem_type: eco_key.to_string(),
        services,
        baseline_value: baseline.baseline_per_hectare,
    }
}

fn fallback_info(key: &str) -> ServiceInfo {
    ServiceInfo {
        name: key.replace('_', " "),
        icon: String::new(),
        color: UNAVAILABLE_COLOR.to_string(),
        description: String::new(),
    }
}
