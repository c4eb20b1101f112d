//! Hosted vector index client
//!
//! Speaks the Pinecone-style data-plane API: `POST /query` for similarity
//! search and `POST /vectors/upsert` for writes, both scoped to a namespace.
//! Chunk text travels in the reserved `text` metadata field; every other
//! metadata field is carried through unchanged.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::providers::vector_index::VectorIndexProvider;
use crate::types::document::{DocumentChunk, ScoredChunk, UpsertItem};

/// Reserved metadata field holding the chunk content
const TEXT_FIELD: &str = "text";

/// Hosted vector index over HTTP
pub struct PineconeIndex {
    client: Client,
    config: IndexConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    namespace: &'a str,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

impl PineconeIndex {
    /// Create a new index client with a bounded per-request wait
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn chunk_from_metadata(metadata: Option<Map<String, Value>>) -> DocumentChunk {
        let mut content = String::new();
        let mut fields = HashMap::new();

        for (key, value) in metadata.unwrap_or_default() {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            if key == TEXT_FIELD {
                content = text;
            } else {
                fields.insert(key, text);
            }
        }

        DocumentChunk::new(content, fields)
    }
}

#[async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<ScoredChunk>> {
        let request = QueryRequest {
            vector: embedding,
            top_k,
            namespace,
            include_metadata: true,
        };

        let response = self
            .client
            .post(format!("{}/query", self.config.host))
            .header("Api-Key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout("vector index query".to_string())
                } else {
                    Error::Retrieval(format!("Index query failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Retrieval(format!(
                "Index query failed: HTTP {} - {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::Retrieval(format!("Failed to parse query response: {}", e)))?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| ScoredChunk {
                chunk: Self::chunk_from_metadata(m.metadata),
                score: m.score,
            })
            .collect())
    }

    async fn upsert(&self, items: &[UpsertItem], namespace: &str) -> Result<()> {
        let vectors: Vec<Value> = items
            .iter()
            .map(|item| {
                let mut metadata = Map::new();
                metadata.insert(TEXT_FIELD.to_string(), Value::String(item.chunk.content.clone()));
                for (key, value) in &item.chunk.metadata {
                    metadata.insert(key.clone(), Value::String(value.clone()));
                }
                json!({
                    "id": item.id,
                    "values": item.embedding,
                    "metadata": metadata,
                })
            })
            .collect();

        let response = self
            .client
            .post(format!("{}/vectors/upsert", self.config.host))
            .header("Api-Key", &self.config.api_key)
            .json(&json!({ "vectors": vectors, "namespace": namespace }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout("vector index upsert".to_string())
                } else {
                    Error::Retrieval(format!("Index upsert failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Retrieval(format!(
                "Index upsert failed: HTTP {} - {}",
                status, body
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_splits_text_from_fields() {
        let mut metadata = Map::new();
        metadata.insert(TEXT_FIELD.to_string(), Value::String("Title: Trail Mix".into()));
        metadata.insert("Price".to_string(), Value::String("$9.99".into()));

        let chunk = PineconeIndex::chunk_from_metadata(Some(metadata));
        assert_eq!(chunk.content, "Title: Trail Mix");
        assert_eq!(chunk.metadata.get("Price").unwrap(), "$9.99");
        assert!(!chunk.metadata.contains_key(TEXT_FIELD));
    }

    #[test]
    fn missing_metadata_yields_empty_chunk() {
        let chunk = PineconeIndex::chunk_from_metadata(None);
        assert!(chunk.content.is_empty());
        assert!(chunk.metadata.is_empty());
    }
}
