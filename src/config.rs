//! Configuration for the assistant service
//!
//! Sections deserialize from an optional TOML file; credentials are taken
//! from the environment so they never live in a checked-in file. Missing
//! credentials are a fatal configuration error at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Hosted model provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Hosted vector index configuration
    #[serde(default)]
    pub index: IndexConfig,
    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Catalog chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// User record store configuration
    #[serde(default)]
    pub users: UserStoreConfig,
}

impl AppConfig {
    /// Load configuration: TOML file (if given) with env-var credentials on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Overlay credentials and endpoints from the environment
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.llm.api_key = key;
        }
        if let Ok(key) = std::env::var("VECTOR_INDEX_API_KEY") {
            self.index.api_key = key;
        }
        if let Ok(host) = std::env::var("VECTOR_INDEX_HOST") {
            self.index.host = host;
        }
        if let Ok(url) = std::env::var("CACHE_REST_URL") {
            self.cache.rest_url = url;
        }
        if let Ok(token) = std::env::var("CACHE_REST_TOKEN") {
            self.cache.rest_token = token;
        }
    }

    /// Check that every required credential is present
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.is_empty() {
            return Err(Error::Config("OPENAI_API_KEY is not set".to_string()));
        }
        if self.index.host.is_empty() {
            return Err(Error::Config("VECTOR_INDEX_HOST is not set".to_string()));
        }
        if self.index.api_key.is_empty() {
            return Err(Error::Config("VECTOR_INDEX_API_KEY is not set".to_string()));
        }
        if self.cache.enabled && (self.cache.rest_url.is_empty() || self.cache.rest_token.is_empty())
        {
            return Err(Error::Config(
                "Cache is enabled but CACHE_REST_URL/CACHE_REST_TOKEN are not set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Hosted model provider configuration (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API key (from OPENAI_API_KEY)
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Chat model used for rewriting and answering
    pub chat_model: String,
    /// Embedding model
    pub embed_model: String,
    /// Sampling temperature; 0 keeps answers tied to the context
    pub temperature: f32,
    /// Bounded wait per request in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

/// Hosted vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index endpoint, e.g. https://my-index-abc123.svc.pinecone.io
    #[serde(default)]
    pub host: String,
    /// Index API key (from VECTOR_INDEX_API_KEY)
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Bounded wait per request in seconds
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Response cache configuration (Redis-compatible REST endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable the cache; the pipeline runs fine without it
    pub enabled: bool,
    /// REST endpoint URL (from CACHE_REST_URL)
    #[serde(default)]
    pub rest_url: String,
    /// Bearer token (from CACHE_REST_TOKEN)
    #[serde(default, skip_serializing)]
    pub rest_token: String,
    /// TTL for cached responses in seconds
    pub ttl_secs: u64,
    /// Bounded wait per request in seconds
    pub timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rest_url: String::new(),
            rest_token: String::new(),
            ttl_secs: 24 * 60 * 60,
            timeout_secs: 5,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Logical partition of the index holding the product catalog
    pub namespace: String,
    /// Maximum number of chunks a similarity search returns
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            namespace: "assistant".to_string(),
            top_k: 4,
        }
    }
}

/// Catalog chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Separator the splitter keeps intact across chunk boundaries
    pub separator: String,
    /// Maximum chunk size in characters
    pub max_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            separator: "\n".to_string(),
            max_chunk_size: 500,
        }
    }
}

/// User record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStoreConfig {
    /// SQLite database path
    pub db_path: PathBuf,
}

impl Default for UserStoreConfig {
    fn default() -> Self {
        let db_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("retail-rag")
            .join("users.db");
        Self { db_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.retrieval.namespace, "assistant");
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.chunking.separator, "\n");
        assert_eq!(config.chunking.max_chunk_size, 500);
    }

    #[test]
    fn missing_credentials_fail_validation() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn sections_override_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [retrieval]
            namespace = "staging"
            top_k = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.retrieval.namespace, "staging");
        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.server.port, 8080);
    }
}
