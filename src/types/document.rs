//! Catalog chunk types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A bounded-length slice of a catalog record, embedded and indexed
/// independently. Metadata is copied unchanged from the parent record to
/// every chunk derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Embeddable text
    pub content: String,
    /// Field name -> value, inherited from the parent record
    pub metadata: HashMap<String, String>,
}

impl DocumentChunk {
    /// Create a chunk
    pub fn new(content: impl Into<String>, metadata: HashMap<String, String>) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// A chunk returned by similarity search, with its relevance score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: DocumentChunk,
    /// Similarity score; higher is more relevant
    pub score: f32,
}

/// A chunk with its embedding, ready to be written to the vector index
#[derive(Debug, Clone)]
pub struct UpsertItem {
    /// Stable vector id
    pub id: String,
    /// Embedding of `chunk.content`
    pub embedding: Vec<f32>,
    /// The chunk itself
    pub chunk: DocumentChunk,
}
