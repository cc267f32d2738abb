//! Embedding generation via an external provider.

use crate::error::{CorporaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default request timeout for embedding calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Trait for embedding providers.
///
/// The orchestrator depends on a single capability: turn a text string into
/// a dense vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedding client for an OpenAI-compatible embeddings API.
pub struct OpenAiEmbedder {
    /// HTTP client.
    client: Client,

    /// API key.
    api_key: SecretString,

    /// API base URL.
    base_url: String,

    /// Model identifier sent with every request.
    model: String,
}

impl OpenAiEmbedder {
    /// Create a new embedding client.
    pub fn new(
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(CorporaError::config("embedding API key is required"));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CorporaError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// Set the request timeout.
    ///
    /// A request that exceeds the deadline surfaces as a retryable
    /// transport error.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CorporaError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(self)
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.is_empty() {
            return Err(CorporaError::validation("embedding input must not be empty"));
        }

        let request = EmbeddingRequest {
            input: text.to_string(),
            model: self.model.clone(),
        };

        debug!(model = %self.model, "requesting embedding");

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The error body is not assumed to be structured; surface the
            // raw status only.
            return Err(CorporaError::provider(
                status.as_u16(),
                status
                    .canonical_reason()
                    .unwrap_or("embedding request failed"),
            ));
        }

        let body = response.text().await?;
        let parsed: EmbeddingResponse = serde_json::from_str(&body)?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| CorporaError::empty_result("provider returned zero embeddings"))
    }
}

// Internal types for the embeddings API

#[derive(Serialize)]
struct EmbeddingRequest {
    input: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
