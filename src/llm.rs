//! Text-completion client with bounded retry and prompt truncation.
//!
//! The driver only ever sees a final string or a typed error after the
//! client's own retries are exhausted; there is no cross-section timeout or
//! cancellation. Retries are synchronous with exponential backoff.

use serde::Deserialize;
use tracing::warn;

use crate::error::CompletionError;
use crate::text::truncate_chars;

/// Appended to a prompt that had to be cut down to fit the request limit.
const TRUNCATION_MARKER: &str = "... [truncated]";

/// Produces a completion for a prompt.
///
/// Implementations own their retry policy; a returned `Err` means the
/// request is not going to succeed and the caller should degrade.
pub trait CompletionProvider {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Configuration for the Ollama completion endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model name to use.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens generated per completion.
    pub max_tokens: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Prompts longer than this many characters are truncated before send,
    /// to avoid request-too-large failures.
    pub max_prompt_chars: usize,
    /// Attempts per completion before giving up.
    pub max_retries: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3.1".into(),
            temperature: 0.5,
            max_tokens: 500,
            timeout_secs: 120,
            max_prompt_chars: 32_000,
            max_retries: 3,
        }
    }
}

/// Client for the Ollama `/api/generate` endpoint.
pub struct OllamaClient {
    config: CompletionConfig,
}

impl OllamaClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self { config }
    }

    /// The model name being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Probe the server with a lightweight request to `/api/tags`.
    pub fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(5))
            .build();
        matches!(agent.get(&url).call(), Ok(resp) if resp.status() == 200)
    }

    /// One request attempt, no retry.
    fn request(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/api/generate", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();

        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens,
            },
        });

        let body_str =
            serde_json::to_string(&body).map_err(|e| CompletionError::ParseError {
                message: format!("JSON serialize error: {e}"),
            })?;

        let resp = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| CompletionError::Request {
                message: e.to_string(),
            })?;

        let resp_str = resp.into_string().map_err(|e| CompletionError::ParseError {
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| CompletionError::ParseError {
                message: e.to_string(),
            })?;

        json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CompletionError::ParseError {
                message: "missing 'response' field".into(),
            })
    }
}

impl CompletionProvider for OllamaClient {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let prompt = truncate_prompt(prompt, self.config.max_prompt_chars);

        let attempts = self.config.max_retries.max(1);
        let mut last_message = String::new();
        for attempt in 0..attempts {
            match self.request(&prompt) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "completion attempt failed");
                    // Keep the transport message bare so the final error does
                    // not nest one failure report inside another.
                    last_message = match e {
                        CompletionError::Request { message } => message,
                        other => other.to_string(),
                    };
                    if attempt + 1 < attempts {
                        std::thread::sleep(std::time::Duration::from_secs(1 << attempt));
                    }
                }
            }
        }
        Err(CompletionError::RetriesExhausted {
            attempts,
            message: last_message,
        })
    }
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

/// Cut a prompt down to `max_chars`, leaving room for a visible marker.
fn truncate_prompt(prompt: &str, max_chars: usize) -> String {
    if prompt.chars().count() <= max_chars {
        return prompt.to_string();
    }
    warn!("prompt truncated to fit request limits");
    let keep = max_chars.saturating_sub(TRUNCATION_MARKER.len());
    format!("{}{}", truncate_chars(prompt, keep), TRUNCATION_MARKER)
}
