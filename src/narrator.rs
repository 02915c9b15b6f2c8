use crate::error::{PhiError, PhiResult};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ImpactCategory {
    Health,
    Economic,
    Biodiversity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Excellent,
    Good,
    Moderate,
    Poor,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactText {
    pub positive: String,
    pub risk: String,
}

impl ImpactText {
    fn new(positive: &str, risk: &str) -> Self {
        Self {
            positive: positive.to_string(),
            risk: risk.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactTier {
    pub min_score: f64,
    pub severity: Severity,
    pub color: String,
    pub health: ImpactText,
    pub economic: ImpactText,
    pub biodiversity: ImpactText,
}

impl ImpactTier {
    fn text(&self, category: ImpactCategory) -> &ImpactText {
        match category {
            ImpactCategory::Health => &self.health,
            ImpactCategory::Economic => &self.economic,
            ImpactCategory::Biodiversity => &self.biodiversity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactStatement {
    pub category: ImpactCategory,
    pub positive: String,
    pub risk: String,
    pub severity: Severity,
    pub color: String,
}

/// Severity tiers, highest threshold first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImpactTable {
    tiers: Vec<ImpactTier>,
}

impl ImpactTable {
    pub fn new(tiers: Vec<ImpactTier>) -> PhiResult<Self> {
        let table = Self { tiers };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> PhiResult<()> {
        if self.tiers.is_empty() {
            return Err(PhiError::Config("impact table is empty".to_string()));
        }
        if self.tiers.iter().any(|t| !t.min_score.is_finite()) {
            return Err(PhiError::Config(
                "impact tier thresholds must be finite".to_string(),
            ));
        }
        if self
            .tiers
            .windows(2)
            .any(|w| w[0].min_score <= w[1].min_score)
        {
            return Err(PhiError::Config(
                "impact tiers must be strictly descending".to_string(),
            ));
        }
        if self.tiers[self.tiers.len() - 1].min_score > 0.0 {
            return Err(PhiError::Config(
                "lowest impact tier must start at or below 0".to_string(),
            ));
        }
        Ok(())
    }

    fn tier(&self, score: f64) -> &ImpactTier {
        self.tiers
            .iter()
            .find(|t| score >= t.min_score)
            .unwrap_or(&self.tiers[self.tiers.len() - 1])
    }

    pub fn narrate(&self, category: ImpactCategory, score: f64) -> ImpactStatement {
        let tier = self.tier(score);
        let text = tier.text(category);
        ImpactStatement {
            category,
            positive: text.positive.clone(),
            risk: text.risk.clone(),
            severity: tier.severity,
            color: tier.color.clone(),
        }
    }

    /// Health, economic and biodiversity statements, in that order.
    pub fn narrate_all(&self, score: f64) -> Vec<ImpactStatement> {
        ImpactCategory::iter()
            .map(|c| self.narrate(c, score))
            .collect()
    }
}

impl Default for ImpactTable {
    fn default() -> Self {
        let tiers = vec![
            ImpactTier {
                min_score: 80.0,
                severity: Severity::Excellent,
                color: "#27ae60".to_string(),
                health: ImpactText::new(
                    "Air and climate conditions actively support respiratory and cognitive health",
                    "Minimal exposure risk; maintain current monitoring",
                ),
                economic: ImpactText::new(
                    "Ecosystem services deliver a premium over baseline value",
                    "Value is concentrated; protect against sudden disturbance",
                ),
                biodiversity: ImpactText::new(
                    "Habitat conditions support rich and stable species communities",
                    "Watch for invasive species exploiting healthy habitat",
                ),
            },
            ImpactTier {
                min_score: 60.0,
                severity: Severity::Good,
                color: "#2ecc71".to_string(),
                health: ImpactText::new(
                    "Conditions are comfortable for most people most of the time",
                    "Sensitive groups may notice occasional peaks",
                ),
                economic: ImpactText::new(
                    "Service value sits at or slightly above baseline",
                    "Gradual decline would erode the current premium",
                ),
                biodiversity: ImpactText::new(
                    "Most native species find adequate habitat",
                    "Edge habitats show early signs of stress",
                ),
            },
            ImpactTier {
                min_score: 40.0,
                severity: Severity::Moderate,
                color: "#f39c12".to_string(),
                health: ImpactText::new(
                    "Conditions are acceptable for short exposure",
                    "Prolonged exposure may affect sensitive groups",
                ),
                economic: ImpactText::new(
                    "Core services are still delivered near baseline",
                    "Service value is at risk of falling below baseline",
                ),
                biodiversity: ImpactText::new(
                    "Generalist species remain well established",
                    "Specialist species are losing suitable habitat",
                ),
            },
            ImpactTier {
                min_score: 20.0,
                severity: Severity::Poor,
                color: "#e74c3c".to_string(),
                health: ImpactText::new(
                    "Targeted mitigation can still restore safe conditions",
                    "Elevated health risk for the general population",
                ),
                economic: ImpactText::new(
                    "Restoration investment would recover significant value",
                    "Service value is discounted well below baseline",
                ),
                biodiversity: ImpactText::new(
                    "Remnant populations can seed recovery",
                    "Local extinctions are likely without intervention",
                ),
            },
            ImpactTier {
                min_score: 0.0,
                severity: Severity::Critical,
                color: "#c0392b".to_string(),
                health: ImpactText::new(
                    "Immediate action has the largest marginal benefit",
                    "Conditions pose an acute health hazard",
                ),
                economic: ImpactText::new(
                    "Any recovery yields outsized value gains",
                    "Ecosystem services are at the valuation floor",
                ),
                biodiversity: ImpactText::new(
                    "Protected refugia may still hold key species",
                    "Ecosystem collapse is under way",
                ),
            },
        ];
        Self { tiers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        let table = ImpactTable::default();
        let sev = |s| table.narrate(ImpactCategory::Health, s).severity;
        assert_eq!(sev(80.0), Severity::Excellent);
        assert_eq!(sev(79.9), Severity::Good);
        assert_eq!(sev(60.0), Severity::Good);
        assert_eq!(sev(40.0), Severity::Moderate);
        assert_eq!(sev(20.0), Severity::Poor);
        assert_eq!(sev(19.9), Severity::Critical);
        assert_eq!(sev(-3.0), Severity::Critical);
    }

    #[test]
    fn categories_get_their_own_text() {
        let table = ImpactTable::default();
        let all = table.narrate_all(55.0);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].category, ImpactCategory::Health);
        assert_eq!(all[2].category, ImpactCategory::Biodiversity);
        assert_ne!(all[0].positive, all[1].positive);
        assert!(all.iter().all(|s| s.severity == Severity::Moderate));
    }

    #[test]
    fn nan_tier_threshold_is_rejected() {
        let mut table = ImpactTable::default();
        table.tiers[1].min_score = f64::NAN;
        assert!(matches!(table.validate(), Err(PhiError::Config(_))));
    }
}
