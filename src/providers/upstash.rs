//! Hosted response cache client
//!
//! Speaks the Upstash-style Redis REST protocol: commands are posted as JSON
//! arrays to the endpoint root and answered as `{"result": ...}`. Entries are
//! written with the configured TTL; eviction beyond that is the store's
//! concern.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::providers::cache::ResponseCache;

/// Redis-compatible REST cache
pub struct UpstashCache {
    client: Client,
    config: CacheConfig,
}

#[derive(Deserialize)]
struct CommandResponse {
    result: Option<Value>,
}

impl UpstashCache {
    /// Create a new cache client with a bounded per-request wait
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn command(&self, command: Value) -> Result<Option<Value>> {
        let response = self
            .client
            .post(&self.config.rest_url)
            .bearer_auth(&self.config.rest_token)
            .json(&command)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout("cache".to_string())
                } else {
                    Error::Cache(format!("Cache request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(Error::Cache(format!(
                "Cache request failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: CommandResponse = response
            .json()
            .await
            .map_err(|e| Error::Cache(format!("Failed to parse cache response: {}", e)))?;

        Ok(parsed.result)
    }
}

#[async_trait]
impl ResponseCache for UpstashCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let result = self.command(json!(["GET", key])).await?;
        Ok(match result {
            Some(Value::String(value)) => Some(value),
            _ => None,
        })
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.command(json!(["SET", key, value, "EX", self.config.ttl_secs]))
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "upstash"
    }
}
