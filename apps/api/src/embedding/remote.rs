//! Remote embedding backend — posts texts to a feature-extraction endpoint
//! (Hugging Face Inference API or a text-embeddings-inference server) and
//! reads back per-token vectors.
//!
//! `Embedder` is synchronous. Requests run on the async client and are driven
//! with the current runtime's `Handle::block_on`, so calls must come from a
//! blocking worker (`spawn_blocking`), never from an async task. Calls are
//! bounded by the configured timeout. There is no retry: a failed call
//! surfaces as `EmbeddingError` and the scoring run degrades.
use std::time::Duration;

use reqwest::Client;
use tokio::runtime::Handle;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::embedding::{Embedder, EmbeddingError, TokenEmbeddings};

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [&'a str],
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

pub struct RemoteEmbedder {
    client: Client,
    url: String,
    api_token: Option<String>,
    model: String,
}

impl RemoteEmbedder {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let url = config
            .url
            .clone()
            .ok_or(EmbeddingError::NotConfigured("EMBEDDING_URL is not set"))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url,
            api_token: config.api_token.clone(),
            model: config.model.clone(),
        })
    }
}

impl Embedder for RemoteEmbedder {
    fn model_name(&self) -> &str {
        &self.model
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
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let handle = Handle::try_current().map_err(|_| {
            EmbeddingError::NotConfigured("remote embedding must run inside a tokio runtime")
        })?;
        handle.block_on(self.fetch(texts))
    }
}

impl RemoteEmbedder {
    async fn fetch(&self, texts: &[&str]) -> Result<Vec<TokenEmbeddings>, EmbeddingError> {
        let body = FeatureExtractionRequest {
            inputs: texts,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        let embeddings = parse_batch(&payload, texts.len())?;
        debug!(
            "Embedded {} texts with {} ({} tokens total)",
            texts.len(),
            self.model,
            embeddings.iter().map(Vec::len).sum::<usize>()
        );
        Ok(embeddings)
    }
}

/// Reads `[batch][token][dim]`, or `[batch][dim]` from servers that pool
/// server-side (treated as a single token).
fn parse_batch(payload: &Value, expected: usize) -> Result<Vec<TokenEmbeddings>, EmbeddingError> {
    let items = payload
        .as_array()
        .ok_or_else(|| EmbeddingError::MalformedResponse("expected a JSON array".to_string()))?;
    if items.len() != expected {
        return Err(EmbeddingError::BatchSize {
            expected,
            found: items.len(),
        });
    }
    items.iter().map(parse_item).collect()
}

fn parse_item(item: &Value) -> Result<TokenEmbeddings, EmbeddingError> {
    let rows = item
        .as_array()
        .ok_or_else(|| EmbeddingError::MalformedResponse("expected an array per input".to_string()))?;

    match rows.first() {
        None => Ok(Vec::new()),
        Some(Value::Array(_)) => rows.iter().map(parse_vector).collect(),
        Some(_) => Ok(vec![parse_vector(item)?]),
    }
}

fn parse_vector(value: &Value) -> Result<Vec<f32>, EmbeddingError> {
    value
        .as_array()
        .ok_or_else(|| EmbeddingError::MalformedResponse("expected a vector".to_string()))?
        .iter()
        .map(|v| {
            v.as_f64().map(|f| f as f32).ok_or_else(|| {
                EmbeddingError::MalformedResponse(format!("non-numeric component: {v}"))
            })
        })
        .collect()
}
