//! Axum route handlers for the Scoring API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::extract_resume_text;
use crate::errors::AppError;
use crate::models::job::{JobFields, JobRequirement};
use crate::models::resume::ResumeProfile;
use crate::models::score::ScoreRecord;
use crate::scoring::aggregate::score_resume;
use crate::scoring::feedback::{generate_feedback, FeedbackReport};
use crate::scoring::report::{render_report, ReportInput};
use crate::scoring::sections::parse_resume;
use crate::scoring::similarity::SimilarityEngine;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub resume_text: String,
    pub job: JobFields,
}

/// Scores already-extracted data. Sections may be strings, lists, or
/// stringified lists.
#[derive(Debug, Deserialize)]
pub struct ScoreProfileRequest {
    pub profile: ResumeProfile,
    pub job: JobRequirement,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub candidate_name: String,
    pub score: ScoreRecord,
    pub feedback: FeedbackReport,
    pub feedback_text: String,
    /// Markdown report for download or display.
    pub report: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
///
/// Previews section extraction for a resume.
pub async fn handle_parse_resume(
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ResumeProfile>, AppError> {
    require_resume_text(&request.resume_text)?;
    Ok(Json(parse_resume(&request.resume_text)))
}

/// POST /api/v1/jobs/parse
///
/// Returns the sections and keyword set derived from job fields.
pub async fn handle_parse_job(Json(fields): Json<JobFields>) -> Json<JobRequirement> {
    Json(JobRequirement::from_fields(&fields))
}

/// POST /api/v1/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    require_resume_text(&request.resume_text)?;

    let engine = state.similarity.clone();
    let response = run_blocking(move || {
        let profile = parse_resume(&request.resume_text);
        let job = JobRequirement::from_fields(&request.job);
        Ok(build_response(&engine, &profile, &job))
    })
    .await?;

    Ok(Json(response))
}

/// POST /api/v1/score/profile
pub async fn handle_score_profile(
    State(state): State<AppState>,
    Json(request): Json<ScoreProfileRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let engine = state.similarity.clone();
    let response =
        run_blocking(move || Ok(build_response(&engine, &request.profile, &request.job))).await?;
    Ok(Json(response))
}

/// POST /api/v1/score/upload
///
/// Multipart form: `resume` (PDF, TXT, or MD file) and `job` (JSON `JobFields`).
pub async fn handle_score_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScoreResponse>, AppError> {
    let mut resume: Option<(String, Bytes)> = None;
    let mut fields: Option<JobFields> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name().map(str::to_owned).as_deref() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                resume = Some((file_name, data));
            }
            Some("job") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read job: {e}")))?;
                let parsed = serde_json::from_str(&raw)
                    .map_err(|e| AppError::Validation(format!("job must be JobFields JSON: {e}")))?;
                fields = Some(parsed);
            }
            _ => {}
        }
    }

    let (file_name, data) =
        resume.ok_or_else(|| AppError::Validation("Missing 'resume' file field".to_string()))?;
    let fields = fields.ok_or_else(|| AppError::Validation("Missing 'job' field".to_string()))?;
    info!("Scoring uploaded resume '{file_name}' ({} bytes)", data.len());

    let engine = state.similarity.clone();
    let response = run_blocking(move || {
        let text = extract_resume_text(&file_name, &data)?;
        require_resume_text(&text)?;
        let profile = parse_resume(&text);
        let job = JobRequirement::from_fields(&fields);
        Ok(build_response(&engine, &profile, &job))
    })
    .await?;

    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Scores, generates feedback, and renders the report for one run.
pub fn build_response(
    engine: &SimilarityEngine,
    profile: &ResumeProfile,
    job: &JobRequirement,
) -> ScoreResponse {
    let run_id = Uuid::new_v4();
    let generated_at = Utc::now();
    info!("Starting scoring run {run_id}");

    let score = score_resume(profile, job, engine);
    if score.is_degraded() {
        warn!("Run {run_id} returned a degraded score record");
    }
    let feedback = generate_feedback(profile, job);
    let candidate_name = profile.candidate_name().to_string();
    let report = render_report(&ReportInput {
        candidate_name: &candidate_name,
        generated_at,
        score: &score,
        feedback: &feedback,
        full_text: &profile.full_text,
    });

    ScoreResponse {
        run_id,
        generated_at,
        candidate_name,
        feedback_text: feedback.to_text(),
        score,
        feedback,
        report,
    }
}

fn require_resume_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    Ok(())
}

/// Embedding inference blocks; keep it off the async executor.
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::embedding::hashing::HashingEmbedder;

    const RESUME: &str = "Jane Doe\n\
        Email: jane@example.com\n\
        \n\
        Skills\n\
        Python, SQL\n\
        \n\
        Experience\n\
        Backend engineer building python services\n\
        \n\
        Education\n\
        BSc Computer Science";

    fn engine() -> SimilarityEngine {
        SimilarityEngine::new(Arc::new(HashingEmbedder::default()))
    }

    fn job_fields() -> JobFields {
        JobFields {
            description: "Backend developer".to_string(),
            skills: "python, sql, docker".to_string(),
            experience: "building backend services".to_string(),
            education: "computer science degree".to_string(),
            ..JobFields::default()
        }
    }

    #[test]
    fn test_build_response_ties_score_feedback_and_report() {
        let profile = parse_resume(RESUME);
        let job = JobRequirement::from_fields(&job_fields());
        let response = build_response(&engine(), &profile, &job);

        assert_eq!(response.candidate_name, "Jane Doe");
        assert!(!response.score.is_degraded());
        assert!(response.score.total_score > 0.0);
        assert_eq!(response.feedback_text, response.feedback.to_text());
        assert!(response.feedback_text.contains("docker"));
        assert!(response.report.contains("**Jane Doe**"));
        assert!(response.report.contains("## Feedback"));
    }

    struct UnreachableEmbedder;

    impl crate::embedding::Embedder for UnreachableEmbedder {
        fn model_name(&self) -> &str {
            "unreachable"
        }

        fn embed_tokens(
            &self,
            _text: &str,
        ) -> Result<crate::embedding::TokenEmbeddings, crate::embedding::EmbeddingError> {
            Err(crate::embedding::EmbeddingError::Api {
                status: 503,
                message: "model loading".to_string(),
            })
        }
    }

    #[test]
    fn test_degraded_run_still_produces_report() {
        let engine = SimilarityEngine::new(Arc::new(UnreachableEmbedder));
        let profile = parse_resume(RESUME);
        let job = JobRequirement::from_fields(&job_fields());
        let response = build_response(&engine, &profile, &job);

        assert!(response.score.is_degraded());
        assert_eq!(response.score.total_score, 0.0);
        assert!(!response.feedback.items.is_empty());
        assert!(response.report.contains("**Jane Doe**"));
    }

    #[test]
    fn test_require_resume_text_rejects_blank() {
        assert!(require_resume_text("  \n ").is_err());
        assert!(require_resume_text("Jane").is_ok());
    }
}
