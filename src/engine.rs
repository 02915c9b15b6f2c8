//! The full evaluation pipeline:
//! readings -> composite score -> ESV -> projections, plus impact statements.
//!
//! An [`Engine`] owns validated reference tables behind an `Arc` and holds
//! no mutable state, so one instance can serve any number of threads.

use crate::config::{Config, TuningParams};
use crate::error::PhiResult;
use crate::narrator::{ImpactCategory, ImpactStatement};
use crate::projection::{self, ScenarioProjections};
use crate::scorer::{CompositeScore, Metric, MetricSample, MetricScore, Observation, Scorer};
use crate::tables::{ReferenceTables, WeightProfile};
use crate::valuation::{self, EsvBreakdown};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// One site to evaluate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteRequest {
    pub site: String,
    pub observation: Observation,
    pub ecosystem: Option<String>,
    pub region: Option<String>,
}

impl SiteRequest {
    pub fn new(site: &str, samples: Vec<MetricSample>) -> Self {
        Self {
            site: site.to_string(),
            observation: Observation::new(samples),
            ..Default::default()
        }
    }

    pub fn ecosystem(mut self, ecosystem: &str) -> Self {
        self.ecosystem = Some(ecosystem.to_string());
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub site: String,
    pub composite: CompositeScore,
    pub esv: EsvBreakdown,
    pub projections: ScenarioProjections,
    pub impacts: Vec<ImpactStatement>,
}

pub struct EngineBuilder {
    tables: Option<ReferenceTables>,
    tuning: TuningParams,
    profile: WeightProfile,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            tables: None,
            tuning: TuningParams::default(),
            profile: WeightProfile::default(),
        }
    }

    pub fn with_tables(mut self, tables: ReferenceTables) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn with_tables_from_file<P: AsRef<Path>>(mut self, path: P) -> PhiResult<Self> {
        self.tables = Some(ReferenceTables::load_from_file(path)?);
        Ok(self)
    }

    pub fn with_tables_from_reader<R: Read>(mut self, reader: R) -> PhiResult<Self> {
        self.tables = Some(ReferenceTables::from_reader(reader)?);
        Ok(self)
    }

    pub fn with_tuning(mut self, tuning: TuningParams) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_profile(mut self, profile: WeightProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_config(self, config: &Config) -> Self {
        self.with_tuning(config.tuning.clone())
            .with_profile(config.site.profile)
    }

    pub fn build(self) -> PhiResult<Engine> {
        let tables = self.tables.unwrap_or_default();
        tables.validate()?;
        self.tuning.validate()?;

        let tables = Arc::new(tables);
        let scorer = Scorer::new(tables.clone(), self.profile, self.tuning.clone())?;
        info!(
            "⚙️  Engine ready: profile '{}', {} weighted metrics, {} ecosystems",
            self.profile,
            scorer.weights().len(),
            tables.ecosystems.len()
        );

        Ok(Engine {
            tables,
            tuning: self.tuning,
            scorer,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    tables: Arc<ReferenceTables>,
    tuning: TuningParams,
    scorer: Scorer,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn tuning(&self) -> &TuningParams {
        &self.tuning
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn normalize(&self, metric: Metric, value: f64) -> Option<MetricScore> {
        self.scorer.normalize(metric, value)
    }

    pub fn aggregate(&self, samples: &[MetricSample]) -> CompositeScore {
        self.scorer.aggregate(samples)
    }

    pub fn aggregate_for(
        &self,
        samples: &[MetricSample],
        ecosystem: Option<&str>,
    ) -> CompositeScore {
        self.scorer.aggregate_for(samples, ecosystem)
    }

    pub fn multiplier(&self, score: f64) -> f64 {
        valuation::phi_multiplier(score, &self.tuning.multiplier())
    }

    pub fn valuate(
        &self,
        score: f64,
        ecosystem: Option<&str>,
        region: Option<&str>,
    ) -> EsvBreakdown {
        valuation::valuate(
            &self.tables,
            &self.tuning.multiplier(),
            score,
            ecosystem,
            region,
        )
    }

    pub fn project(&self, current_value: f64, current_score: f64) -> ScenarioProjections {
        projection::project(
            &self.tables.scenarios,
            current_value,
            current_score,
            self.tuning.score_growth_damping,
        )
    }

    pub fn narrate(&self, category: ImpactCategory, score: f64) -> ImpactStatement {
        self.tables.impacts.narrate(category, score)
    }

    pub fn evaluate(&self, request: &SiteRequest, now: DateTime<Utc>) -> Assessment {
        let composite = self.scorer.aggregate_observation_for(
            &request.observation,
            request.ecosystem.as_deref(),
            now,
        );
        let score = composite.overall_score;

        let esv = self.valuate(
            score,
            request.ecosystem.as_deref(),
            request.region.as_deref(),
        );
        let projections = self.project(esv.adjusted_value, score);
        let impacts = self.tables.impacts.narrate_all(score);

        debug!(
            "Site '{}': PHI {:.1} ({}), ESV {:.0} USD/ha",
            request.site, score, composite.grade, esv.adjusted_value
        );

        Assessment {
            site: request.site.clone(),
            composite,
            esv,
            projections,
            impacts,
        }
    }

    /// Evaluates every site in parallel. Output order matches input order.
    pub fn evaluate_batch(&self, requests: &[SiteRequest], now: DateTime<Utc>) -> Vec<Assessment> {
        requests
            .par_iter()
            .map(|req| self.evaluate(req, now))
            .collect()
    }
}
