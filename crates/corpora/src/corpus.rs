//! Corpus orchestration: ingestion and retrieval against the remote index.

use crate::config::CorporaConfig;
use crate::embeddings::{Embedder, OpenAiEmbedder};
use crate::index::{PineconeIndex, VectorIndex};
use crate::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// One ingested snippet mirrored locally.
///
/// Entries are created only by [`Corpus::ingest`] and never mutated
/// afterwards; the text lives only here, the remote index stores just the
/// vector under the id.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CorpusEntry {
    /// Caller-supplied identifier.
    pub id: String,

    /// Original snippet text.
    pub text: String,

    /// Embedding acknowledged by the remote index.
    pub embedding: Vec<f32>,

    /// Ingestion timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CorpusEntry {
    fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding,
            created_at: chrono::Utc::now(),
        }
    }
}

/// A retrieval outcome: the matched identifier and, when the snippet was
/// ingested through this session, its text.
#[derive(Debug, Clone)]
pub struct Retrieved {
    /// Identifier of the top-ranked match.
    pub id: String,

    /// Snippet text resolved from the local mirror, if known.
    pub text: Option<String>,
}

/// Orchestrator binding the embedding provider and the remote vector index.
///
/// Owns the local mirror of everything ingested in this session. The mirror
/// is only ever appended to after the corresponding remote upsert has been
/// acknowledged, so it never claims more than the index holds.
pub struct Corpus {
    /// Embedding provider.
    embedder: Arc<dyn Embedder>,

    /// Remote vector index.
    index: Arc<dyn VectorIndex>,

    /// Local mirror of ingested entries.
    entries: RwLock<Vec<CorpusEntry>>,
}

impl Corpus {
    /// Create an orchestrator over the given collaborators.
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Create an orchestrator with HTTP clients built from configuration.
    ///
    /// Fails immediately on incomplete configuration, before any network
    /// call is possible.
    pub fn from_config(config: CorporaConfig) -> Result<Self> {
        config.validate()?;
        let embedder = OpenAiEmbedder::new(
            config.embedding_api_key,
            config.embedding_url,
            config.embedding_model,
        )?;
        let index = PineconeIndex::new(config.index_api_key, config.index_url)?;
        Ok(Self::new(Arc::new(embedder), Arc::new(index)))
    }

    /// Ingest a snippet under a caller-supplied id.
    ///
    /// Embeds the text, upserts the vector remotely, then records the entry
    /// in the local mirror. The operation is atomic with respect to the
    /// mirror: if either remote step fails, local state is unchanged.
    ///
    /// Re-ingesting an existing id overwrites the remote vector
    /// (last-write-wins) and replaces the mirror entry rather than
    /// appending a duplicate.
    pub async fn ingest(&self, id: &str, text: &str) -> Result<()> {
        let embedding = self.embedder.embed(text).await?;
        self.index.upsert(id, &embedding).await?;

        // The remote write is acknowledged; only now does the entry become
        // visible locally.
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => {
                *existing = CorpusEntry::new(id, text, embedding);
                debug!(id, "replaced corpus entry");
            }
            None => {
                entries.push(CorpusEntry::new(id, text, embedding));
                debug!(id, total = entries.len(), "appended corpus entry");
            }
        }
        Ok(())
    }

    /// Retrieve the id of the stored snippet most relevant to `query`.
    ///
    /// Returns `Ok(None)` when the index has no match at all; that is a
    /// valid outcome, not an error. This is a pure read: the query text is
    /// not recorded anywhere.
    pub async fn retrieve(&self, query: &str) -> Result<Option<String>> {
        let embedding = self.embedder.embed(query).await?;
        let matches = self.index.query(&embedding, 1).await?;
        Ok(matches.into_iter().next().map(|m| m.id))
    }

    /// Retrieve the most relevant snippet and resolve its text from the
    /// local mirror.
    ///
    /// The text is `None` when the id was ingested outside this session.
    pub async fn retrieve_text(&self, query: &str) -> Result<Option<Retrieved>> {
        let Some(id) = self.retrieve(query).await? else {
            return Ok(None);
        };
        let text = self.resolve(&id).await;
        Ok(Some(Retrieved { id, text }))
    }

    /// Look up the original text for an id ingested in this session.
    pub async fn resolve(&self, id: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries.iter().find(|e| e.id == id).map(|e| e.text.clone())
    }

    /// Number of entries in the local mirror.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the local mirror is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
