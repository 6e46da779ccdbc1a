//! In-process memo of token embeddings, keyed by exact text.
//!
//! Job sections repeat across scoring runs against the same posting, and
//! empty or boilerplate sections repeat everywhere.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::embedding::{Embedder, EmbeddingError, TokenEmbeddings};

const MAX_ENTRIES: usize = 4096;

pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    entries: Mutex<HashMap<String, TokenEmbeddings>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, TokenEmbeddings>> {
        // A poisoned map only holds finished entries; keep using it.
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Embedder for CachedEmbedder {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn embed_tokens(&self, text: &str) -> Result<TokenEmbeddings, EmbeddingError> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or(EmbeddingError::BatchSize {
                expected: 1,
                found: 0,
            })
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<TokenEmbeddings>, EmbeddingError> {
        // Hits are copied out under the lock; a later eviction cannot drop them.
        let mut found: HashMap<&str, TokenEmbeddings> = HashMap::new();
        let mut misses: Vec<&str> = Vec::new();
        {
            let entries = self.lock();
            for &text in texts {
                if found.contains_key(text) || misses.contains(&text) {
                    continue;
                }
                match entries.get(text) {
                    Some(tokens) => {
                        found.insert(text, tokens.clone());
                    }
                    None => misses.push(text),
                }
            }
        }

        if !misses.is_empty() {
            debug!(
                "Embedding cache: {} hits, {} misses",
                found.len(),
                misses.len()
            );
            let fresh = self.inner.embed_batch(&misses)?;
            if fresh.len() != misses.len() {
                return Err(EmbeddingError::BatchSize {
                    expected: misses.len(),
                    found: fresh.len(),
                });
            }
            let mut entries = self.lock();
            if entries.len() + fresh.len() > MAX_ENTRIES {
                debug!("Embedding cache full ({} entries), clearing", entries.len());
                entries.clear();
            }
            for (&text, tokens) in misses.iter().zip(fresh) {
                entries.insert(text.to_string(), tokens.clone());
                found.insert(text, tokens);
            }
        }

        texts
            .iter()
            .map(|&text| {
                found.get(text).cloned().ok_or(EmbeddingError::BatchSize {
                    expected: texts.len(),
                    found: found.len(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how many texts reach the wrapped backend.
    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl Embedder for CountingEmbedder {
        fn model_name(&self) -> &str {
            "counting"
        }

        fn embed_tokens(&self, text: &str) -> Result<TokenEmbeddings, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![vec![text.len() as f32, 1.0]])
        }
    }

    #[test]
    fn test_repeated_texts_hit_backend_once() {
        let counting = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cache = CachedEmbedder::new(counting.clone());

        let first = cache.embed_batch(&["rust", "sql", "rust"]).unwrap();
        let second = cache.embed_tokens("sql").unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first[0], first[2]);
        assert_eq!(second, first[1]);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.lock().len(), 2);
    }

    #[test]
    fn test_hits_survive_eviction_in_same_batch() {
        let cache = CachedEmbedder::new(Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        }));
        let warm = cache.embed_tokens("job skills text").unwrap();

        let filler: Vec<String> = (0..MAX_ENTRIES - 2).map(|i| format!("filler {i}")).collect();
        let filler: Vec<&str> = filler.iter().map(String::as_str).collect();
        cache.embed_batch(&filler).unwrap();
        assert_eq!(cache.lock().len(), MAX_ENTRIES - 1);

        let batch = cache
            .embed_batch(&["job skills text", "new a", "new b"])
            .unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], warm);
        assert_eq!(cache.lock().len(), 2);
    }

    #[test]
    fn test_model_name_passes_through() {
        let cache = CachedEmbedder::new(Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        }));
        assert_eq!(cache.model_name(), "counting");
    }
}
