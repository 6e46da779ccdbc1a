//! Text embedding backends.
//!
//! Every backend produces a variable-length sequence of per-token vectors for a
//! text. Pooling and similarity live here so all backends are compared the
//! same way.
//!
//! The embedder is expensive to set up. `build_embedder` is called once at
//! startup and the result is shared through `AppState`.

pub mod cache;
pub mod hashing;
pub mod remote;

use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::embedding::cache::CachedEmbedder;
use crate::embedding::hashing::HashingEmbedder;
use crate::embedding::remote::RemoteEmbedder;

/// Per-token feature vectors for one text: `[token][dim]`.
pub type TokenEmbeddings = Vec<Vec<f32>>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding backend not configured: {0}")]
    NotConfigured(&'static str),

    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("cannot pool an empty token sequence")]
    EmptyEmbedding,

    #[error("token {index} has dimension {found}, expected {expected}")]
    RaggedTokens {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("vector dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("backend returned {found} embeddings for {expected} inputs")]
    BatchSize { expected: usize, found: usize },
}

/// A pretrained (or stand-in) model mapping text to per-token vectors.
pub trait Embedder: Send + Sync {
    fn model_name(&self) -> &str;

    fn embed_tokens(&self, text: &str) -> Result<TokenEmbeddings, EmbeddingError>;

    /// Embeds several texts. Backends that can batch a forward pass override this.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<TokenEmbeddings>, EmbeddingError> {
        texts.iter().map(|text| self.embed_tokens(text)).collect()
    }
}

/// Averages the token vectors into one fixed-size vector.
pub fn mean_pool(tokens: &[Vec<f32>]) -> Result<Vec<f32>, EmbeddingError> {
    let first = tokens.first().ok_or(EmbeddingError::EmptyEmbedding)?;
    let dim = first.len();
    if dim == 0 {
        return Err(EmbeddingError::EmptyEmbedding);
    }

    let mut sums = vec![0.0_f64; dim];
    for (index, token) in tokens.iter().enumerate() {
        if token.len() != dim {
            return Err(EmbeddingError::RaggedTokens {
                index,
                expected: dim,
                found: token.len(),
            });
        }
        for (sum, value) in sums.iter_mut().zip(token) {
            *sum += f64::from(*value);
        }
    }

    let count = tokens.len() as f64;
    Ok(sums.into_iter().map(|sum| (sum / count) as f32).collect())
}

/// Cosine similarity in [-1, 1]. A zero vector has similarity 0 with anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Builds the configured backend wrapped in a per-process cache.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let inner: Arc<dyn Embedder> = match config.backend {
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.dim)),
        EmbeddingBackend::Remote => Arc::new(RemoteEmbedder::from_config(config)?),
    };
    info!("Embedding backend initialized (model: {})", inner.model_name());
    Ok(Arc::new(CachedEmbedder::new(inner)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_pool_averages_tokens() {
        let pooled = mean_pool(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(pooled, vec![2.0, 3.0]);
    }

    #[test]
    fn test_mean_pool_rejects_empty_and_ragged() {
        assert!(matches!(mean_pool(&[]), Err(EmbeddingError::EmptyEmbedding)));
        assert!(matches!(
            mean_pool(&[vec![1.0, 2.0], vec![1.0]]),
            Err(EmbeddingError::RaggedTokens { index: 1, .. })
        ));
    }

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = vec![0.3, -1.2, 4.5];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-9, "got {sim}");
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
        let opposite = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((opposite + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch_errors() {
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(EmbeddingError::DimensionMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn test_build_embedder_hashing_backend() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Hashing,
            dim: 64,
            ..EmbeddingConfig::default()
        };
        let embedder = build_embedder(&config).unwrap();
        let tokens = embedder.embed_tokens("rust and sql").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].len(), 64);
    }
}
