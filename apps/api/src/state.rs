use crate::config::Config;
use crate::scoring::similarity::SimilarityEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Wraps the process-wide embedder, built once at startup.
    pub similarity: SimilarityEngine,
}
