//! Offline embedding backend based on signed feature hashing.
//!
//! Each token is represented by its character trigrams (with `<`/`>` word
//! boundaries) plus the whole token, each hashed into a fixed-width vector
//! with a pseudo-random sign. Tokens sharing subwords (`nodejs`, `node.js`)
//! land close together. Output is deterministic across runs and platforms.

use sha2::{Digest, Sha256};

use crate::embedding::{Embedder, EmbeddingError, TokenEmbeddings};
use crate::scoring::tokens::tokenize;

pub const DEFAULT_DIM: usize = 384;
const MODEL_NAME: &str = "hashing-trigram";
const WHOLE_TOKEN_WEIGHT: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn token_vector(&self, token: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dim];

        let padded: Vec<char> = format!("<{token}>").chars().collect();
        for window in padded.windows(3) {
            let gram: String = window.iter().collect();
            let (index, sign) = self.bucket(&gram);
            vector[index] += sign;
        }

        let (index, sign) = self.bucket(token);
        vector[index] += sign * WHOLE_TOKEN_WEIGHT;
        vector
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut head = [0_u8; 8];
        head.copy_from_slice(&digest[..8]);
        let index = (u64::from_le_bytes(head) % self.dim as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    /// Texts without any token yield an empty sequence.
    fn embed_tokens(&self, text: &str) -> Result<TokenEmbeddings, EmbeddingError> {
        Ok(tokenize(text).map(|token| self.token_vector(&token)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{cosine_similarity, mean_pool};

    fn pooled(embedder: &HashingEmbedder, text: &str) -> Vec<f32> {
        mean_pool(&embedder.embed_tokens(text).unwrap()).unwrap()
    }

    #[test]
    fn test_one_vector_per_token() {
        let embedder = HashingEmbedder::new(32);
        let tokens = embedder.embed_tokens("python sql docker").unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| t.len() == 32));
    }

    #[test]
    fn test_deterministic() {
        let a = HashingEmbedder::default().embed_tokens("rust").unwrap();
        let b = HashingEmbedder::default().embed_tokens("rust").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_punctuation_only_text_has_no_tokens() {
        let tokens = HashingEmbedder::default().embed_tokens(" , ; ").unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_related_text_scores_above_unrelated() {
        let embedder = HashingEmbedder::default();
        let job = pooled(&embedder, "nodejs express javascript");
        let related = pooled(&embedder, "node.js express.js javascript");
        let unrelated = pooled(&embedder, "watercolor painting");
        let close = cosine_similarity(&job, &related).unwrap();
        let far = cosine_similarity(&job, &unrelated).unwrap();
        assert!(close > far, "close={close} far={far}");
    }

    #[test]
    fn test_zero_dim_is_clamped() {
        let tokens = HashingEmbedder::new(0).embed_tokens("go").unwrap();
        assert_eq!(tokens[0].len(), 1);
    }
}
