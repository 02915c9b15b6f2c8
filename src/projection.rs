//! Multi-year forward projections of ecosystem value, health score and
//! carbon capture under the three growth scenarios.

use crate::consts::{CARBON_HORIZON_YEARS, PROJECTION_YEARS, SCORE_CEILING};
use crate::error::{PhiError, PhiResult};
use serde::{Deserialize, Serialize};
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
pub enum Scenario {
    Conservative,
    Moderate,
    Optimistic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    pub scenario: Scenario,
    /// Annual ESV growth rate.
    pub growth_rate: f64,
    /// Base carbon capture in t CO2 per hectare per year.
    pub carbon_rate: f64,
    pub label: String,
    pub color: String,
    pub description: String,
}

pub fn default_scenarios() -> Vec<ScenarioDefinition> {
    let def = |scenario: Scenario,
               growth_rate: f64,
               carbon_rate: f64,
               label: &str,
               color: &str,
               description: &str| {
        ScenarioDefinition {
            scenario,
            growth_rate,
            carbon_rate,
            label: label.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        }
    };
    vec![
        def(
            Scenario::Conservative,
            0.02,
            2.5,
            "Conservative",
            "#95a5a6",
            "Current management continues with minimal restoration",
        ),
        def(
            Scenario::Moderate,
            0.045,
            4.0,
            "Moderate",
            "#3498db",
            "Active conservation with targeted restoration",
        ),
        def(
            Scenario::Optimistic,
            0.08,
            6.0,
            "Optimistic",
            "#27ae60",
            "Full restoration programme with community stewardship",
        ),
    ]
}

/// Exactly one definition per scenario, both rates strictly increasing
/// from conservative to optimistic.
pub fn validate_scenarios(defs: &[ScenarioDefinition]) -> PhiResult<()> {
    let mut ordered = Vec::with_capacity(3);
    for scenario in Scenario::iter() {
        let matches: Vec<&ScenarioDefinition> =
            defs.iter().filter(|d| d.scenario == scenario).collect();
        if matches.len() != 1 {
            return Err(PhiError::Config(format!(
                "scenario '{}' must be defined exactly once (found {})",
                scenario,
                matches.len()
            )));
        }
        ordered.push(matches[0]);
    }
    if defs.len() != ordered.len() {
        return Err(PhiError::Config(format!(
            "expected {} scenarios, found {}",
            ordered.len(),
            defs.len()
        )));
    }
    for d in &ordered {
        if !d.growth_rate.is_finite() || d.growth_rate <= -1.0 || !d.carbon_rate.is_finite() {
            return Err(PhiError::Config(format!(
                "scenario '{}' has invalid rates",
                d.scenario
            )));
        }
    }
    for pair in ordered.windows(2) {
        if pair[0].growth_rate >= pair[1].growth_rate || pair[0].carbon_rate >= pair[1].carbon_rate
        {
            return Err(PhiError::Config(format!(
                "scenario '{}' must have strictly lower growth and carbon rates than '{}'",
                pair[0].scenario, pair[1].scenario
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub year: u32,
    pub esv: f64,
    pub carbon: f64,
    pub cumulative_carbon: f64,
    pub phi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonYear {
    pub year: u32,
    pub carbon: f64,
    pub cumulative_carbon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub scenario: Scenario,
    pub label: String,
    pub color: String,
    /// Years 0, 1, 3 and 5.
    pub projections: Vec<YearlyProjection>,
    /// Years 1 through 5.
    pub carbon_series: Vec<CarbonYear>,
    pub total_carbon: f64,
    pub esv_growth_percent: i64,
    #[serde(rename = "year5ESV")]
    pub year5_esv: f64,
}

impl ProjectionResult {
    pub fn at_year(&self, year: u32) -> Option<&YearlyProjection> {
        self.projections.iter().find(|p| p.year == year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjections {
    pub conservative: ProjectionResult,
    pub moderate: ProjectionResult,
    pub optimistic: ProjectionResult,
}

impl ScenarioProjections {
    pub fn get(&self, scenario: Scenario) -> &ProjectionResult {
        match scenario {
            Scenario::Conservative => &self.conservative,
            Scenario::Moderate => &self.moderate,
            Scenario::Optimistic => &self.optimistic,
        }
    }

    /// Conservative, moderate, optimistic.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectionResult> {
        [&self.conservative, &self.moderate, &self.optimistic].into_iter()
    }
}

fn esv_at(def: &ScenarioDefinition, current_value: f64, year: u32) -> f64 {
    current_value * (1.0 + def.growth_rate).powi(year as i32)
}

/// Score grows `damping` times as fast as value and never passes 100.
fn phi_at(def: &ScenarioDefinition, current_score: f64, damping: f64, year: u32) -> f64 {
    (current_score * (1.0 + def.growth_rate * damping).powi(year as i32)).min(SCORE_CEILING)
}

/// Per-year capture rate: flat through year 1, then rising linearly as the
/// ecosystem matures.
pub fn carbon_at(def: &ScenarioDefinition, year: u32) -> f64 {
    let maturity = year.saturating_sub(1) as f64;
    def.carbon_rate * (1.0 + (def.growth_rate / 2.0) * maturity)
}

/// Sum of the per-year rates for years `1..=year`. Kept as an explicit
/// year-by-year sum so the rate may later vary per year.
pub fn cumulative_carbon(def: &ScenarioDefinition, year: u32) -> f64 {
    let mut total = 0.0;
    for y in 1..=year {
        total += carbon_at(def, y);
    }
    total
}

pub fn project_scenario(
    def: &ScenarioDefinition,
    current_value: f64,
    current_score: f64,
    damping: f64,
) -> ProjectionResult {
    let projections = PROJECTION_YEARS
        .iter()
        .map(|&year| YearlyProjection {
            year,
            esv: esv_at(def, current_value, year),
            carbon: carbon_at(def, year),
            cumulative_carbon: cumulative_carbon(def, year),
            phi: phi_at(def, current_score, damping, year),
        })
        .collect();

    let carbon_series = (1..=CARBON_HORIZON_YEARS)
        .map(|year| CarbonYear {
            year,
            carbon: carbon_at(def, year),
            cumulative_carbon: cumulative_carbon(def, year),
        })
        .collect();

    let year5_esv = esv_at(def, current_value, 5);
    let esv_growth_percent = if current_value != 0.0 {
        ((year5_esv - current_value) / current_value * 100.0).round() as i64
    } else {
        0
    };

    ProjectionResult {
        scenario: def.scenario,
        label: def.label.clone(),
        color: def.color.clone(),
        projections,
        carbon_series,
        total_carbon: cumulative_carbon(def, CARBON_HORIZON_YEARS),
        esv_growth_percent,
        year5_esv,
    }
}

/// Project all three scenarios.
///
/// # Panics
/// If `defs` lacks a scenario. Tables passed through
/// [`validate_scenarios`] never do.
pub fn project(
    defs: &[ScenarioDefinition],
    current_value: f64,
    current_score: f64,
    damping: f64,
) -> ScenarioProjections {
    let run = |scenario: Scenario| {
        let def = defs
            .iter()
            .find(|d| d.scenario == scenario)
            .unwrap_or_else(|| panic!("scenario '{}' is not defined", scenario));
        project_scenario(def, current_value, current_score, damping)
    };
    ScenarioProjections {
        conservative: run(Scenario::Conservative),
        moderate: run(Scenario::Moderate),
        optimistic: run(Scenario::Optimistic),
    }
}
