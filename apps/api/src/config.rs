use anyhow::{bail, Context, Result};

use crate::embedding::hashing::DEFAULT_DIM;

const DEFAULT_MODEL: &str = "distilbert-base-uncased";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Offline feature-hashing model. Deterministic, no network.
    Hashing,
    /// HTTP feature-extraction endpoint serving a pretrained model.
    Remote,
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub url: Option<String>,
    pub api_token: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub dim: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Hashing,
            url: None,
            api_token: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dim: DEFAULT_DIM,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but malformed, or if the remote
/// backend is selected without an endpoint.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding: EmbeddingConfig,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = match lookup("EMBEDDING_BACKEND").as_deref() {
            None | Some("hashing") => EmbeddingBackend::Hashing,
            Some("remote") => EmbeddingBackend::Remote,
            Some(other) => bail!("EMBEDDING_BACKEND must be 'hashing' or 'remote', got '{other}'"),
        };

        let url = lookup("EMBEDDING_URL").filter(|u| !u.trim().is_empty());
        if backend == EmbeddingBackend::Remote && url.is_none() {
            bail!("Required environment variable 'EMBEDDING_URL' is not set (EMBEDDING_BACKEND=remote)");
        }

        let embedding = EmbeddingConfig {
            backend,
            url,
            api_token: lookup("EMBEDDING_API_TOKEN").filter(|t| !t.is_empty()),
            model: lookup("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs: parse_or(&lookup, "EMBEDDING_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            dim: parse_or(&lookup, "EMBEDDING_DIM", DEFAULT_DIM)?,
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.embedding.backend, EmbeddingBackend::Hashing);
        assert_eq!(config.embedding.model, "distilbert-base-uncased");
        assert_eq!(config.embedding.timeout_secs, 30);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_remote_backend_requires_url() {
        assert!(config_from(&[("EMBEDDING_BACKEND", "remote")]).is_err());

        let config = config_from(&[
            ("EMBEDDING_BACKEND", "remote"),
            ("EMBEDDING_URL", "http://localhost:8081/embed"),
            ("EMBEDDING_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.embedding.backend, EmbeddingBackend::Remote);
        assert_eq!(config.embedding.timeout_secs, 5);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(config_from(&[("EMBEDDING_BACKEND", "onnx")]).is_err());
    }

    #[test]
    fn test_malformed_port_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
