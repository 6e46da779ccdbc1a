//! Score Aggregator — combines section similarities, keyword overlap, and
//! structure into one `ScoreRecord`.
//!
//! `try_score_resume` returns a typed error. `score_resume` is the boundary
//! callers use: any error becomes a degraded record (`total_score = 0`,
//! `error` set) so a failed run still produces a report.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::embedding::EmbeddingError;
use crate::models::job::JobRequirement;
use crate::models::resume::{ResumeProfile, Section};
use crate::models::score::ScoreRecord;
use crate::scoring::normalize::normalize_sections;
use crate::scoring::similarity::SimilarityEngine;
use crate::scoring::structure::check_structure;
use crate::scoring::tokens::{normalize_keyword, tokenize};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Weights of the total score. They sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub skills: f64,
    pub experience: f64,
    pub projects: f64,
    pub entity: f64,
    pub education: f64,
    pub certifications: f64,
    pub languages: f64,
    pub structure: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            skills: 0.35,
            experience: 0.25,
            projects: 0.20,
            entity: 0.10,
            education: 0.05,
            certifications: 0.03,
            languages: 0.01,
            structure: 0.01,
        }
    }
}

impl ScoreWeights {
    #[cfg(test)]
    pub fn sum(&self) -> f64 {
        self.skills
            + self.experience
            + self.projects
            + self.entity
            + self.education
            + self.certifications
            + self.languages
            + self.structure
    }

    /// Weighted sum of the sub-scores carried by `record`.
    pub fn combine(&self, record: &ScoreRecord) -> f64 {
        self.skills * record.skills_score
            + self.experience * record.experience_score
            + self.projects * record.projects_score
            + self.entity * record.entity_score
            + self.education * record.education_score
            + self.certifications * record.certifications_score
            + self.languages * record.languages_score
            + self.structure * record.structure_score
    }
}

/// Scores a resume against a job. Never fails; see module docs.
pub fn score_resume(
    profile: &ResumeProfile,
    job: &JobRequirement,
    engine: &SimilarityEngine,
) -> ScoreRecord {
    match try_score_resume(profile, job, engine) {
        Ok(record) => record,
        Err(e) => {
            error!("Scoring failed, returning degraded record: {e}");
            ScoreRecord::degraded(e.to_string())
        }
    }
}

pub fn try_score_resume(
    profile: &ResumeProfile,
    job: &JobRequirement,
    engine: &SimilarityEngine,
) -> Result<ScoreRecord, ScoringError> {
    let resume_texts = normalize_sections(&profile.sections);
    let job_texts = normalize_sections(&job.sections);

    let pairs: Vec<(&str, &str)> = Section::ALL
        .iter()
        .map(|&section| (resume_texts.get(section), job_texts.get(section)))
        .collect();
    let similarities = engine.similarities(&pairs)?;
    let section_score = |section: Section| {
        Section::ALL
            .iter()
            .position(|&s| s == section)
            .and_then(|i| similarities.get(i))
            .map(|sim| sim * 100.0)
            .unwrap_or(0.0)
    };

    let structure = check_structure(&profile.full_text);

    let mut record = ScoreRecord {
        total_score: 0.0,
        entity_score: entity_score(&profile.entities, &job.keywords),
        skills_score: section_score(Section::Skills),
        experience_score: section_score(Section::WorkExperience),
        education_score: section_score(Section::Education),
        certifications_score: section_score(Section::Certifications),
        projects_score: section_score(Section::Projects),
        languages_score: section_score(Section::Languages),
        structure_score: structure.score,
        sections: structure.sections,
        error: None,
    };
    record.total_score = ScoreWeights::default().combine(&record);
    round_scores(&mut record);

    info!(
        "Scored resume with {}: total={} skills={} experience={} projects={}",
        engine.model_name(),
        record.total_score,
        record.skills_score,
        record.experience_score,
        record.projects_score
    );

    Ok(record)
}

/// Share of job keywords found among the tokens of the resume's entities, in
/// [0, 100]. Zero when the job has no keywords.
pub fn entity_score(entities: &[String], keywords: &BTreeSet<String>) -> f64 {
    let keywords: HashSet<String> = keywords
        .iter()
        .map(|k| normalize_keyword(k))
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return 0.0;
    }

    let resume_tokens: HashSet<String> = entities.iter().flat_map(|e| tokenize(e)).collect();
    let matched = keywords.intersection(&resume_tokens).count();
    matched as f64 / keywords.len() as f64 * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round_scores(record: &mut ScoreRecord) {
    for score in [
        &mut record.total_score,
        &mut record.entity_score,
        &mut record.skills_score,
        &mut record.experience_score,
        &mut record.education_score,
        &mut record.certifications_score,
        &mut record.projects_score,
        &mut record.languages_score,
        &mut record.structure_score,
    ] {
        *score = round2(*score);
    }
}
