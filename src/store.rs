//! Vector store query interface.
//!
//! The engine does not own an index, embeddings, or a connection; it
//! consumes a similarity-query interface over a pre-built index. Concrete
//! backends (`DuckDB`, `Qdrant`, in-memory) implement [`VectorStore`] and
//! are responsible for their own connection management and, where the
//! underlying connection is not thread-safe, their own serialization.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RagError;

/// A passage returned by a similarity query.
///
/// Immutable once created. `similarity` is whatever monotonic score the
/// backing store reports; the engine never rescales or re-sorts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text.
    pub text: String,
    /// Similarity score between the query and this passage.
    pub similarity: f32,
    /// Stable identifier of the source chunk, when the store provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl RetrievedPassage {
    /// Deduplication key: `source_id` when present, otherwise exact text.
    #[must_use]
    pub fn dedup_key(&self) -> &str {
        self.source_id.as_deref().unwrap_or(&self.text)
    }
}

/// Similarity-query interface over a persisted embedding index.
///
/// Implementations must be safe for concurrent use by multiple
/// simultaneous `ask` invocations; the engine performs no locking.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Runs a similarity query, returning up to `top_k` passages ranked
    /// best match first. Ties keep store order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StoreUnavailable`] if the store cannot be
    /// reached or the query fails.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievedPassage>, RagError>;

    /// Whether the store is reachable and queryable.
    ///
    /// Surrounding applications use this to gate access before the first
    /// `ask`; the engine itself relies on `query` errors.
    async fn is_available(&self) -> bool;
}
