//! Vector index provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::{ScoredChunk, UpsertItem};

/// Trait for a managed vector store partitioned into namespaces
///
/// The query path is read-only; only the offline ingestion job writes.
///
/// Implementations:
/// - `PineconeIndex`: hosted index over HTTP
/// - `MemoryVectorIndex`: in-memory cosine search for tests
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Similarity search restricted to one namespace
    ///
    /// Returns at most `top_k` chunks ordered by descending score.
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<ScoredChunk>>;

    /// Write embedded chunks into a namespace
    async fn upsert(&self, items: &[UpsertItem], namespace: &str) -> Result<()>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
