use crate::error::{PhiError, PhiResult};
use serde::{Deserialize, Serialize};

/// One row of the grade table: any score `>= min_score` falls in this band
/// unless an earlier (higher) band already matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub min_score: f64,
    pub grade: String,
    pub label: String,
    pub color: String,
}

impl GradeBand {
    pub fn new(min_score: f64, grade: &str, label: &str, color: &str) -> Self {
        Self {
            min_score,
            grade: grade.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}

/// Ordered list of bands, highest threshold first. Shared by the metric
/// and composite graders so boundaries are identical everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeTable {
    bands: Vec<GradeBand>,
}

impl Default for GradeTable {
    fn default() -> Self {
        Self {
            bands: vec![
                GradeBand::new(80.0, "A", "Excellent", "#27ae60"),
                GradeBand::new(60.0, "B", "Good", "#2ecc71"),
                GradeBand::new(40.0, "C", "Moderate", "#f39c12"),
                GradeBand::new(20.0, "D", "Poor", "#e74c3c"),
                GradeBand::new(0.0, "F", "Critical", "#c0392b"),
            ],
        }
    }
}

impl GradeTable {
    pub fn new(bands: Vec<GradeBand>) -> PhiResult<Self> {
        let table = Self { bands };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> PhiResult<()> {
        if self.bands.is_empty() {
            return Err(PhiError::Config("grade table is empty".to_string()));
        }
        if let Some(band) = self.bands.iter().find(|b| !b.min_score.is_finite()) {
            return Err(PhiError::Config(format!(
                "grade '{}' has a non-finite threshold ({})",
                band.grade, band.min_score
            )));
        }
        for pair in self.bands.windows(2) {
            if pair[0].min_score <= pair[1].min_score {
                return Err(PhiError::Config(format!(
                    "grade thresholds must be strictly descending ('{}' at {} precedes '{}' at {})",
                    pair[0].grade, pair[0].min_score, pair[1].grade, pair[1].min_score
                )));
            }
        }
        let last = &self.bands[self.bands.len() - 1];
        if last.min_score > 0.0 {
            return Err(PhiError::Config(format!(
                "lowest grade '{}' must start at or below 0 (found {})",
                last.grade, last.min_score
            )));
        }
        Ok(())
    }

    /// First band (descending) whose threshold the score reaches.
    /// Scores below every threshold fall into the worst band.
    pub fn resolve(&self, score: f64) -> &GradeBand {
        self.bands
            .iter()
            .find(|band| score >= band.min_score)
            .unwrap_or_else(|| self.worst())
    }

    /// The lowest band. Used for the empty composite.
    pub fn worst(&self) -> &GradeBand {
        // validate() guarantees at least one band
        &self.bands[self.bands.len() - 1]
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    /// Grade letter to color, for consumers that only kept the letter.
    pub fn color_for(&self, grade: &str) -> Option<&str> {
        self.bands
            .iter()
            .find(|b| b.grade == grade)
            .map(|b| b.color.as_str())
    }
}
