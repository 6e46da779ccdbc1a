use serde::{Deserialize, Serialize};

/// Whether one structural category was detected in the resume text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPresence {
    pub section: String,
    pub present: bool,
}

/// Result of one scoring run. All scores are in [0, 100] and rounded to two
/// decimals; `total_score` is the weighted sum of the eight sub-scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub total_score: f64,
    pub entity_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub certifications_score: f64,
    pub projects_score: f64,
    pub languages_score: f64,
    pub structure_score: f64,
    pub sections: Vec<SectionPresence>,
    /// Set only on degraded records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreRecord {
    /// A zeroed record carrying the reason scoring could not complete.
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Named scores in report order, total first.
    pub fn named_scores(&self) -> [(&'static str, f64); 9] {
        [
            ("total_score", self.total_score),
            ("entity_score", self.entity_score),
            ("skills_score", self.skills_score),
            ("experience_score", self.experience_score),
            ("education_score", self.education_score),
            ("certifications_score", self.certifications_score),
            ("projects_score", self.projects_score),
            ("languages_score", self.languages_score),
            ("structure_score", self.structure_score),
        ]
    }
}
