//! Sentence embeddings for similarity search.
//!
//! The provider is an explicitly constructed, explicitly injected instance
//! passed into the index builder and the retriever. There is no hidden
//! module-level model; tests substitute a deterministic stub.

use serde::Deserialize;

use crate::error::EmbedError;

/// Produces a fixed-dimension embedding vector for a text.
///
/// One run uses a single provider throughout, so all vectors share a
/// dimension. Dimension consistency is enforced at index-build time.
pub trait EmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Configuration for the Ollama embedding endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Embedding model name.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "all-minilm".into(),
            timeout_secs: 60,
        }
    }
}

/// Embedding provider backed by the Ollama `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    config: EmbeddingConfig,
}

impl OllamaEmbedder {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    /// The model name being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();

        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": text,
        });

        let body_str = serde_json::to_string(&body).map_err(|e| EmbedError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| EmbedError::RequestFailed {
                message: e.to_string(),
            })?;

        let resp_str = resp.into_string().map_err(|e| EmbedError::ParseError {
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| EmbedError::ParseError {
                message: e.to_string(),
            })?;

        let vector: Vec<f32> = json["embedding"]
            .as_array()
            .ok_or_else(|| EmbedError::ParseError {
                message: "missing 'embedding' field".into(),
            })?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();

        if vector.is_empty() {
            return Err(EmbedError::EmptyVector);
        }
        Ok(vector)
    }
}

impl std::fmt::Debug for OllamaEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaEmbedder")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}
