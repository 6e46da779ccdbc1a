//! Similarity Engine — semantic closeness of two texts in [0, 1].
//!
//! Each text is embedded into per-token vectors, mean-pooled into one vector,
//! and compared by cosine similarity. Negative cosines clamp to 0.
//!
//! Empty input: a text that is blank, or that the model maps to no tokens, is
//! treated as a zero vector and has similarity 0 with everything.

use std::collections::HashMap;
use std::sync::Arc;

use crate::embedding::{cosine_similarity, mean_pool, Embedder, EmbeddingError};

/// Holds the shared embedder. Cheap to clone.
#[derive(Clone)]
pub struct SimilarityEngine {
    embedder: Arc<dyn Embedder>,
}

impl SimilarityEngine {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    #[cfg(test)]
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64, EmbeddingError> {
        Ok(self
            .similarities(&[(a, b)])?
            .into_iter()
            .next()
            .unwrap_or(0.0))
    }

    /// Scores several pairs with a single batched embedding call covering
    /// every distinct non-blank text.
    pub fn similarities(&self, pairs: &[(&str, &str)]) -> Result<Vec<f64>, EmbeddingError> {
        let mut texts: Vec<&str> = Vec::new();
        for &(a, b) in pairs {
            for text in [a, b] {
                if !text.trim().is_empty() && !texts.contains(&text) {
                    texts.push(text);
                }
            }
        }

        let matrices = if texts.is_empty() {
            Vec::new()
        } else {
            self.embedder.embed_batch(&texts)?
        };
        if matrices.len() != texts.len() {
            return Err(EmbeddingError::BatchSize {
                expected: texts.len(),
                found: matrices.len(),
            });
        }

        let mut pooled: HashMap<&str, Vec<f32>> = HashMap::new();
        for (text, tokens) in texts.iter().zip(matrices) {
            if !tokens.is_empty() {
                pooled.insert(*text, mean_pool(&tokens)?);
            }
        }

        pairs
            .iter()
            .map(|(a, b)| match (pooled.get(a), pooled.get(b)) {
                (Some(va), Some(vb)) => Ok(cosine_similarity(va, vb)?.clamp(0.0, 1.0)),
                _ => Ok(0.0),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::hashing::HashingEmbedder;
    use crate::embedding::TokenEmbeddings;

    fn engine() -> SimilarityEngine {
        SimilarityEngine::new(Arc::new(HashingEmbedder::default()))
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn model_name(&self) -> &str {
            "failing"
        }

        fn embed_tokens(&self, _text: &str) -> Result<TokenEmbeddings, EmbeddingError> {
            Err(EmbeddingError::EmptyEmbedding)
        }
    }

    #[test]
    fn test_identical_text_is_one() {
        let sim = engine().similarity("python sql docker", "python sql docker").unwrap();
        assert!((sim - 1.0).abs() < 1e-9, "got {sim}");
    }

    #[test]
    fn test_empty_text_is_zero() {
        let engine = engine();
        assert_eq!(engine.similarity("", "python").unwrap(), 0.0);
        assert_eq!(engine.similarity("   ", "").unwrap(), 0.0);
        assert_eq!(engine.similarity(" , ", "python").unwrap(), 0.0);
    }

    #[test]
    fn test_result_within_unit_interval() {
        let sims = engine()
            .similarities(&[("rust", "go"), ("cooking", "rust systems"), ("a b c", "x y z")])
            .unwrap();
        assert_eq!(sims.len(), 3);
        assert!(sims.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_blank_pairs_skip_the_model() {
        let engine = SimilarityEngine::new(Arc::new(FailingEmbedder));
        assert_eq!(engine.similarities(&[("", " ")]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let engine = SimilarityEngine::new(Arc::new(FailingEmbedder));
        assert!(engine.similarity("rust", "go").is_err());
    }
}
