pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Parsing previews
        .route("/api/v1/resumes/parse", post(handlers::handle_parse_resume))
        .route("/api/v1/jobs/parse", post(handlers::handle_parse_job))
        // Scoring
        .route("/api/v1/score", post(handlers::handle_score))
        .route("/api/v1/score/profile", post(handlers::handle_score_profile))
        .route(
            "/api/v1/score/upload",
            post(handlers::handle_score_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
