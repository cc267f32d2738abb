//! Configuration for the orchestrator's external collaborators.

use crate::error::{CorporaError, Result};
use secrecy::{ExposeSecret, SecretString};

/// Default embedding provider base URL.
const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com";

/// Default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Configuration for a corpus session.
///
/// Every required field is validated eagerly at construction; no network
/// call is attempted with incomplete configuration.
#[derive(Debug, Clone)]
pub struct CorporaConfig {
    /// API key for the embedding provider.
    pub embedding_api_key: SecretString,

    /// API key for the vector index.
    pub index_api_key: SecretString,

    /// Base URL of the vector index.
    pub index_url: String,

    /// Base URL of the embedding provider.
    pub embedding_url: String,

    /// Embedding model identifier.
    pub embedding_model: String,
}

impl CorporaConfig {
    /// Create a configuration from the three required values.
    pub fn new(
        embedding_api_key: impl Into<String>,
        index_api_key: impl Into<String>,
        index_url: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            embedding_api_key: SecretString::new(embedding_api_key.into()),
            index_api_key: SecretString::new(index_api_key.into()),
            index_url: index_url.into(),
            embedding_url: DEFAULT_EMBEDDING_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `OPENAI_API_KEY`, `PINECONE_API_KEY` and `PINECONE_URL`.
    pub fn from_env() -> Result<Self> {
        let embedding_api_key = require_env("OPENAI_API_KEY")?;
        let index_api_key = require_env("PINECONE_API_KEY")?;
        let index_url = require_env("PINECONE_URL")?;
        Self::new(embedding_api_key, index_api_key, index_url)
    }

    /// Set the embedding provider base URL (for compatible APIs or tests).
    pub fn with_embedding_url(mut self, url: impl Into<String>) -> Self {
        self.embedding_url = url.into();
        self
    }

    /// Set the embedding model.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Validate that every required field is present.
    pub fn validate(&self) -> Result<()> {
        if self.embedding_api_key.expose_secret().is_empty() {
            return Err(CorporaError::config("embedding API key is required"));
        }
        if self.index_api_key.expose_secret().is_empty() {
            return Err(CorporaError::config("index API key is required"));
        }
        if self.index_url.is_empty() {
            return Err(CorporaError::config("index URL is required"));
        }
        if self.embedding_url.is_empty() {
            return Err(CorporaError::config("embedding URL is required"));
        }
        if self.embedding_model.is_empty() {
            return Err(CorporaError::config("embedding model is required"));
        }
        Ok(())
    }
}

/// Read a required environment variable, naming it in the error.
fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| CorporaError::config(format!("{name} is not set")))
}
