//! Remote vector index client.

use crate::error::{CorporaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Default request timeout for index calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A single ranked result from a nearest-neighbor query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Identifier the vector was stored under.
    pub id: String,

    /// Similarity score, if the index reports one.
    #[serde(default)]
    pub score: Option<f32>,
}

/// Callback receiving the serialized outbound query request.
///
/// Invoked best-effort for diagnostics; it can never fail or block the
/// query itself.
pub type QueryInspector = Arc<dyn Fn(&str) + Send + Sync>;

/// Trait for remote vector indexes.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or overwrite a single vector under `id`.
    ///
    /// The write must not be assumed successful on any non-2xx response.
    async fn upsert(&self, id: &str, vector: &[f32]) -> Result<()>;

    /// Nearest-neighbor search returning up to `top_k` ranked matches.
    ///
    /// Zero matches is a valid empty result, not an error.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>>;
}

/// Vector index client for a Pinecone-style HTTP API.
pub struct PineconeIndex {
    /// HTTP client.
    client: Client,

    /// API key sent as the `Api-Key` header.
    api_key: SecretString,

    /// Index base URL.
    base_url: String,

    /// Optional diagnostic hook for outbound query requests.
    inspector: Option<QueryInspector>,
}

impl PineconeIndex {
    /// Create a new index client.
    pub fn new(api_key: SecretString, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if api_key.expose_secret().is_empty() {
            return Err(CorporaError::config("index API key is required"));
        }
        if base_url.is_empty() {
            return Err(CorporaError::config("index URL is required"));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CorporaError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            inspector: None,
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

    /// Install a diagnostic hook that observes serialized query requests.
    pub fn with_query_inspector(mut self, inspector: QueryInspector) -> Self {
        self.inspector = Some(inspector);
        self
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, id: &str, vector: &[f32]) -> Result<()> {
        let request = UpsertRequest {
            vectors: vec![UpsertVector {
                id: id.to_string(),
                values: vector.to_vec(),
            }],
        };

        debug!(id, dimension = vector.len(), "upserting vector");

        let response = self
            .client
            .post(format!("{}/vectors/upsert", self.base_url))
            .header("Api-Key", self.api_key.expose_secret())
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CorporaError::provider(
                status.as_u16(),
                format!("upsert of {id} failed"),
            ));
        }

        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>> {
        if top_k == 0 {
            return Err(CorporaError::validation("top_k must be at least 1"));
        }

        // Values and metadata are always requested even though only ids are
        // consumed today; callers may grow into them.
        let request = QueryRequest {
            include_values: "true",
            include_metadata: "true",
            top_k,
            vector: vector.to_vec(),
        };

        if let Some(inspector) = &self.inspector {
            if let Ok(raw) = serde_json::to_string(&request) {
                inspector(&raw);
            }
        }

        debug!(top_k, dimension = vector.len(), "querying index");

        let response = self
            .client
            .post(format!("{}/query", self.base_url))
            .header("Api-Key", self.api_key.expose_secret())
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CorporaError::provider(status.as_u16(), "query failed"));
        }

        let body = response.text().await?;
        let parsed: QueryResponse = serde_json::from_str(&body)?;

        Ok(parsed.matches)
    }
}

// Internal types for the index API

#[derive(Serialize)]
struct UpsertRequest {
    vectors: Vec<UpsertVector>,
}

#[derive(Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
}

#[derive(Serialize)]
struct QueryRequest {
    #[serde(rename = "includeValues")]
    include_values: &'static str,
    #[serde(rename = "includeMetadata")]
    include_metadata: &'static str,
    #[serde(rename = "topK")]
    top_k: usize,
    vector: Vec<f32>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default, alias = "Matches")]
    matches: Vec<Match>,
}
