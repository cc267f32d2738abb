//! RAG corpus orchestration for Corpora.
//!
//! This crate provides:
//! - Embedding generation via an OpenAI-compatible embeddings API
//! - A remote vector index client (Pinecone-style upsert/query)
//! - A corpus orchestrator that keeps a local text mirror consistent with
//!   the remote index
//!
//! The remote index returns only identifiers on query; the orchestrator's
//! local mirror is what maps an identifier back to its original snippet.

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod error;
pub mod index;

pub use config::CorporaConfig;
pub use corpus::{Corpus, CorpusEntry, Retrieved};
pub use embeddings::{Embedder, OpenAiEmbedder};
pub use error::{CorporaError, Result};
pub use index::{Match, PineconeIndex, VectorIndex};
