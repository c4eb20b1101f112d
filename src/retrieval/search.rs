//! Retriever: query text in, ranked catalog chunks out

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::vector_index::VectorIndexProvider;
use crate::types::document::ScoredChunk;

/// Read-only similarity search restricted to one namespace
///
/// Embeds the query, delegates to the vector index, and guarantees the
/// result shape: at most top-K chunks, non-increasing relevance.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    namespace: String,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever over an embedder and an index
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            namespace: config.namespace.clone(),
            top_k: config.top_k,
        }
    }

    /// Retrieve the top-K most similar catalog chunks for a query
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        tracing::debug!(query, namespace = %self.namespace, "Retrieving context");

        let embedding = self.embedder.embed(query).await?;
        let mut results = self
            .index
            .search(&embedding, self.top_k, &self.namespace)
            .await?;

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(self.top_k);

        tracing::debug!(chunks = results.len(), "Context retrieved");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::MemoryVectorIndex;
    use crate::types::document::{DocumentChunk, UpsertItem};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Deterministic embedder: maps known words onto axis-aligned vectors
    struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed(&self, text: &str) -> crate::error::Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(vec![
                lower.contains("snack") as u8 as f32,
                lower.contains("coffee") as u8 as f32,
                lower.contains("bakery") as u8 as f32,
            ])
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "keyword"
        }
    }

    async fn seeded_retriever(top_k: usize) -> Retriever {
        let embedder = Arc::new(KeywordEmbedder);
        let index = Arc::new(MemoryVectorIndex::new());

        let items: Vec<UpsertItem> = [
            ("snack-1", "Sub Category: snacks\nTitle: Trail Mix", vec![1.0, 0.0, 0.0]),
            ("snack-2", "Sub Category: snacks\nTitle: Cashews", vec![0.9, 0.1, 0.0]),
            ("coffee-1", "Sub Category: coffee\nTitle: Dark Roast", vec![0.0, 1.0, 0.0]),
            ("bakery-1", "Sub Category: bakery\nTitle: Croissants", vec![0.0, 0.0, 1.0]),
        ]
        .into_iter()
        .map(|(id, content, embedding)| UpsertItem {
            id: id.to_string(),
            embedding,
            chunk: DocumentChunk::new(content, HashMap::new()),
        })
        .collect();

        index.upsert(&items, "assistant").await.unwrap();

        let config = RetrievalConfig {
            namespace: "assistant".to_string(),
            top_k,
        };
        Retriever::new(embedder, index, &config)
    }

    #[tokio::test]
    async fn results_are_bounded_and_ordered() {
        let retriever = seeded_retriever(2).await;
        let results = retriever.retrieve("cheap snacks").await.unwrap();

        assert!(results.len() <= 2);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(results[0].chunk.content.contains("snacks"));
    }

    #[tokio::test]
    async fn top_match_follows_the_query_topic() {
        let retriever = seeded_retriever(1).await;
        let results = retriever.retrieve("good coffee").await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].chunk.content.contains("coffee"));
    }
}
