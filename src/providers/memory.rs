//! In-memory providers
//!
//! Cosine-similarity vector index and a map-backed response cache, used to
//! exercise the pipeline without any hosted service.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::error::Result;
use crate::providers::cache::ResponseCache;
use crate::providers::vector_index::VectorIndexProvider;
use crate::types::document::{ScoredChunk, UpsertItem};

/// In-memory vector index with exact cosine search
#[derive(Default)]
pub struct MemoryVectorIndex {
    namespaces: RwLock<Vec<(String, UpsertItem)>>,
}

impl MemoryVectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vectors stored in a namespace
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .iter()
            .filter(|(ns, _)| ns == namespace)
            .count()
    }

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorIndexProvider for MemoryVectorIndex {
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<ScoredChunk>> {
        let mut results: Vec<ScoredChunk> = self
            .namespaces
            .read()
            .iter()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, item)| ScoredChunk {
                chunk: item.chunk.clone(),
                score: Self::cosine(embedding, &item.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        Ok(results)
    }

    async fn upsert(&self, items: &[UpsertItem], namespace: &str) -> Result<()> {
        let mut store = self.namespaces.write();
        for item in items {
            store.retain(|(ns, existing)| !(ns == namespace && existing.id == item.id));
            store.push((namespace.to_string(), item.clone()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Map-backed response cache
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
