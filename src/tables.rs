//! Static reference data: grade bands, response curves, weight profiles,
//! ecosystem pillar weights, data quality criticality, ecosystem baselines,
//! regional factors, scenarios and impact texts.
//!
//! Everything the algorithms read from lives here so a deployment can swap
//! any table through JSON without touching control flow. Missing sections
//! in a JSON file fall back to the built-in defaults.

use crate::consts::STANDARD_PRESSURE_HPA;
use crate::error::{PhiError, PhiResult};
use crate::grading::GradeTable;
use crate::narrator::ImpactTable;
use crate::projection::{validate_scenarios, ScenarioDefinition};
use crate::quality::QualityTable;
use crate::scorer::curves::Curve;
use crate::scorer::types::{Metric, Pillar};
use crate::valuation::baselines::{default_ecosystems, default_regions, default_services};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{info, warn};

/// Key of the ecosystem profile used when a type is unknown or absent.
pub const DEFAULT_ECOSYSTEM: &str = "default";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum WeightProfile {
    /// Ground sensors: gas and climate.
    #[default]
    Sensor,
    /// Satellite-derived indices.
    RemoteSensing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemBaseline {
    /// Annual ecosystem service value in USD per hectare.
    pub baseline_per_hectare: f64,
    /// Service key -> USD/ha/yr.
    pub services: BTreeMap<String, f64>,
}

/// Presentation payload for a service. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    pub factors: BTreeMap<String, f64>,
    pub default_factor: f64,
}

impl Default for RegionTable {
    fn default() -> Self {
        default_regions()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceTables {
    pub grades: GradeTable,
    pub curves: BTreeMap<Metric, Curve>,
    pub weights: BTreeMap<WeightProfile, BTreeMap<Metric, f64>>,
    /// Ecosystem -> pillar multipliers applied on top of the profile weights.
    pub pillar_weights: BTreeMap<String, BTreeMap<Pillar, f64>>,
    pub quality: QualityTable,
    pub ecosystems: BTreeMap<String, EcosystemBaseline>,
    pub services: BTreeMap<String, ServiceInfo>,
    pub regions: RegionTable,
    pub scenarios: Vec<ScenarioDefinition>,
    pub impacts: ImpactTable,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self {
            grades: GradeTable::default(),
            curves: default_curves(),
            weights: default_weights(),
            pillar_weights: default_pillar_weights(),
            quality: QualityTable::default(),
            ecosystems: default_ecosystems(),
            services: default_services(),
            regions: default_regions(),
            scenarios: crate::projection::default_scenarios(),
            impacts: ImpactTable::default(),
        }
    }
}

impl ReferenceTables {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PhiResult<Self> {
        let path = path.as_ref();
        info!("📚 Loading reference tables from {}", path.display());
        let content = fs::read_to_string(path)?;
        let tables: Self = serde_json::from_str(&content)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_reader<R: Read>(reader: R) -> PhiResult<Self> {
        let tables: Self = serde_json::from_reader(reader)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Checks every table invariant. Called before any engine is built so
    /// that scoring itself never has to fail.
    pub fn validate(&self) -> PhiResult<()> {
        self.grades.validate()?;

        for (metric, curve) in &self.curves {
            curve
                .validate()
                .map_err(|e| PhiError::Config(format!("{}: {}", metric, e)))?;
        }

        if self.weights.is_empty() {
            return Err(PhiError::Config("no weight profiles defined".to_string()));
        }
        for (profile, weights) in &self.weights {
            if weights.is_empty() {
                return Err(PhiError::Config(format!(
                    "weight profile '{}' is empty",
                    profile
                )));
            }
            for (metric, w) in weights {
                if !w.is_finite() || *w <= 0.0 {
                    return Err(PhiError::Config(format!(
                        "weight for '{}' in profile '{}' must be positive (got {})",
                        metric, profile, w
                    )));
                }
                if !self.curves.contains_key(metric) {
                    return Err(PhiError::Config(format!(
                        "no response curve registered for metric '{}' (profile '{}')",
                        metric, profile
                    )));
                }
            }
        }

        self.validate_pillar_weights()?;
        self.quality.validate()?;

        if !self.ecosystems.contains_key(DEFAULT_ECOSYSTEM) {
            return Err(PhiError::Config(format!(
                "ecosystem table must contain a '{}' profile",
                DEFAULT_ECOSYSTEM
            )));
        }
        for (key, eco) in &self.ecosystems {
            check_key("ecosystem", key)?;
            if eco.services.is_empty() {
                return Err(PhiError::Config(format!(
                    "ecosystem '{}' has no services",
                    key
                )));
            }
            if let Some((svc, v)) = eco
                .services
                .iter()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(PhiError::Config(format!(
                    "service '{}' of ecosystem '{}' has invalid value {}",
                    svc, key, v
                )));
            }
            let sum: f64 = eco.services.values().sum();
            if (sum - eco.baseline_per_hectare).abs() > 1e-6 {
                warn!(
                    "Ecosystem '{}' baseline {} differs from its service total {}",
                    key, eco.baseline_per_hectare, sum
                );
            }
        }

        for (key, factor) in &self.regions.factors {
            check_key("region", key)?;
            check_factor(key, *factor)?;
        }
        check_factor("default", self.regions.default_factor)?;

        validate_scenarios(&self.scenarios)?;
        self.impacts.validate()?;
        Ok(())
    }

    fn validate_pillar_weights(&self) -> PhiResult<()> {
        let default = self.pillar_weights.get(DEFAULT_ECOSYSTEM).ok_or_else(|| {
            PhiError::Config(format!(
                "pillar weight table must contain a '{}' entry",
                DEFAULT_ECOSYSTEM
            ))
        })?;
        if let Some(p) = Pillar::iter().find(|p| !default.contains_key(p)) {
            return Err(PhiError::Config(format!(
                "default pillar weights have no entry for '{}'",
                p
            )));
        }
        for (key, pillars) in &self.pillar_weights {
            check_key("pillar weight ecosystem", key)?;
            if let Some((p, w)) = pillars.iter().find(|(_, w)| !w.is_finite() || **w <= 0.0) {
                return Err(PhiError::Config(format!(
                    "pillar weight for '{}' in '{}' must be positive (got {})",
                    p, key, w
                )));
            }
        }
        Ok(())
    }

    /// Pillar multipliers for an ecosystem. Unknown or absent types use the
    /// default entry, and pillars an entry leaves out take the default value.
    pub fn pillar_weights_for(&self, ecosystem: Option<&str>) -> (&str, BTreeMap<Pillar, f64>) {
        let default = self.pillar_weights.get_key_value(DEFAULT_ECOSYSTEM);
        let chosen = ecosystem
            .and_then(|raw| self.pillar_weights.get_key_value(normalize_key(raw).as_str()))
            .or(default);
        let Some((key, pillars)) = chosen else {
            return (DEFAULT_ECOSYSTEM, BTreeMap::new());
        };
        let resolved = Pillar::iter()
            .filter_map(|p| {
                pillars
                    .get(&p)
                    .or_else(|| default.and_then(|(_, d)| d.get(&p)))
                    .map(|w| (p, *w))
            })
            .collect();
        (key.as_str(), resolved)
    }

    pub fn profile_weights(&self, profile: WeightProfile) -> PhiResult<&BTreeMap<Metric, f64>> {
        self.weights.get(&profile).ok_or_else(|| {
            PhiError::Config(format!("weight profile '{}' is not defined", profile))
        })
    }

    /// Resolved key and baseline. Unknown or absent types fall back to
    /// the default profile.
    ///
    /// # Panics
    /// If the tables have no default ecosystem; `validate` rejects those.
    pub fn ecosystem(&self, key: Option<&str>) -> (&str, &EcosystemBaseline) {
        if let Some(raw) = key {
            let wanted = normalize_key(raw);
            if let Some((k, eco)) = self.ecosystems.get_key_value(wanted.as_str()) {
                return (k.as_str(), eco);
            }
            warn!("Unknown ecosystem type '{}', using '{}'", raw, DEFAULT_ECOSYSTEM);
        }
        let (k, eco) = self
            .ecosystems
            .get_key_value(DEFAULT_ECOSYSTEM)
            .unwrap_or_else(|| panic!("ecosystem table has no '{}' profile", DEFAULT_ECOSYSTEM));
        (k.as_str(), eco)
    }

    /// Unknown or absent regions get the default factor.
    pub fn regional_factor(&self, region: Option<&str>) -> f64 {
        match region {
            Some(raw) => match self.regions.factors.get(normalize_key(raw).as_str()) {
                Some(f) => *f,
                None => {
                    warn!(
                        "Unknown region '{}', using default factor {}",
                        raw, self.regions.default_factor
                    );
                    self.regions.default_factor
                }
            },
            None => self.regions.default_factor,
        }
    }
}

/// `"Tropical Forest"`, `"tropical-forest"` -> `"tropical_forest"`.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

fn check_key(kind: &str, key: &str) -> PhiResult<()> {
    if normalize_key(key) != key {
        return Err(PhiError::Config(format!(
            "{} key '{}' must be lower snake_case",
            kind, key
        )));
    }
    Ok(())
}

fn check_factor(key: &str, factor: f64) -> PhiResult<()> {
    if !(factor > 0.0 && factor <= 1.0) {
        return Err(PhiError::Config(format!(
            "regional factor for '{}' must be in (0, 1] (got {})",
            key, factor
        )));
    }
    Ok(())
}

pub fn default_curves() -> BTreeMap<Metric, Curve> {
    BTreeMap::from([
        // Each band loses score faster than the one before it.
        (
            Metric::Co2,
            Curve::PiecewiseLinear {
                points: vec![
                    (400.0, 100.0),
                    (700.0, 92.0),
                    (1000.0, 80.0),
                    (1500.0, 55.0),
                    (2500.0, 0.0),
                ],
            },
        ),
        (
            Metric::Temperature,
            Curve::Gaussian {
                optimum: 22.0,
                sigma: 5.0,
                range: None,
            },
        ),
        (
            Metric::Humidity,
            Curve::Gaussian {
                optimum: 50.0,
                sigma: 15.0,
                range: None,
            },
        ),
        (
            Metric::Light,
            Curve::Band {
                min: 300.0,
                max: 1000.0,
                below_penalty: 1.0 / 3.0,
                above_penalty: 0.005,
            },
        ),
        (
            Metric::Pressure,
            Curve::Deviation {
                reference: STANDARD_PRESSURE_HPA,
                penalty: 2.0,
            },
        ),
        (
            Metric::Ndvi,
            Curve::Linear {
                v_min: 0.0,
                v_max: 0.9,
            },
        ),
        (
            Metric::Aod,
            Curve::InverseLinear {
                v_min: 0.0,
                v_max: 1.0,
            },
        ),
        (
            Metric::LandSurfaceTemp,
            Curve::Gaussian {
                optimum: 25.0,
                sigma: 10.0,
                range: Some((-40.0, 60.0)),
            },
        ),
        (
            Metric::SoilMoisture,
            Curve::Gaussian {
                optimum: 0.3,
                sigma: 0.1,
                range: Some((0.0, 0.6)),
            },
        ),
        (Metric::DroughtIndex, Curve::Centered { v_max: 3.0 }),
        (
            Metric::TreeCover,
            Curve::Sigmoid {
                v_min: 0.0,
                v_max: 100.0,
                k: 0.5,
                v_mid: Some(40.0),
            },
        ),
    ])
}

/// Relative pillar importance per ecosystem. Rows sum to 1.
pub fn default_pillar_weights() -> BTreeMap<String, BTreeMap<Pillar, f64>> {
    use Pillar::*;
    let rows = [
        (DEFAULT_ECOSYSTEM, [0.25, 0.25, 0.25, 0.25]),
        ("tropical_forest", [0.15, 0.30, 0.35, 0.20]),
        ("temperate_forest", [0.20, 0.25, 0.35, 0.20]),
        ("mangrove", [0.15, 0.25, 0.30, 0.30]),
        ("wetland", [0.15, 0.25, 0.20, 0.40]),
        ("grassland_savanna", [0.20, 0.35, 0.15, 0.30]),
        ("agricultural", [0.25, 0.30, 0.10, 0.35]),
        ("urban_green", [0.40, 0.25, 0.15, 0.20]),
    ];
    rows.into_iter()
        .map(|(key, [a, b, c, d])| {
            let pillars = BTreeMap::from([
                (Atmospheric, a),
                (Biodiversity, b),
                (Carbon, c),
                (Degradation, d),
            ]);
            (key.to_string(), pillars)
        })
        .collect()
}

pub fn default_weights() -> BTreeMap<WeightProfile, BTreeMap<Metric, f64>> {
    BTreeMap::from([
        (
            WeightProfile::Sensor,
            BTreeMap::from([
                (Metric::Co2, 0.30),
                (Metric::Temperature, 0.25),
                (Metric::Humidity, 0.20),
                (Metric::Light, 0.15),
                (Metric::Pressure, 0.10),
            ]),
        ),
        (
            WeightProfile::RemoteSensing,
            BTreeMap::from([
                (Metric::Ndvi, 0.25),
                (Metric::TreeCover, 0.20),
                (Metric::Aod, 0.15),
                (Metric::LandSurfaceTemp, 0.15),
                (Metric::SoilMoisture, 0.15),
                (Metric::DroughtIndex, 0.10),
            ]),
        ),
    ])
}
