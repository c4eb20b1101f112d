//! Application state for the assistant server

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::pipeline::ConversationPipeline;
use crate::providers::cache::ResponseCache;
use crate::providers::openai::OpenAiClient;
use crate::providers::pinecone::PineconeIndex;
use crate::providers::upstash::UpstashCache;
use crate::users::{SqliteUserStore, UserStore};

/// Shared application state
///
/// Every external client is constructed once here and injected into the
/// pipeline; nothing reaches for an ambient singleton.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pipeline: ConversationPipeline,
    users: Arc<dyn UserStore>,
}

impl AppState {
    /// Build state over the hosted providers
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let llm = Arc::new(OpenAiClient::new(&config.llm)?);
        tracing::info!(model = %config.llm.chat_model, "Model provider initialized");

        let index = Arc::new(PineconeIndex::new(&config.index)?);
        tracing::info!(namespace = %config.retrieval.namespace, "Vector index client initialized");

        let cache: Option<Arc<dyn ResponseCache>> = if config.cache.enabled {
            tracing::info!("Response cache enabled");
            Some(Arc::new(UpstashCache::new(&config.cache)?))
        } else {
            None
        };

        let pipeline =
            ConversationPipeline::new(llm.clone(), llm, index, cache, &config.retrieval);

        let users = Arc::new(SqliteUserStore::new(&config.users.db_path)?);
        tracing::info!(path = %config.users.db_path.display(), "User store initialized");

        Ok(Self::from_parts(config, pipeline, users))
    }

    /// Build state from pre-constructed components (used by tests to swap in
    /// fakes)
    pub fn from_parts(
        config: AppConfig,
        pipeline: ConversationPipeline,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                users,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the conversational pipeline
    pub fn pipeline(&self) -> &ConversationPipeline {
        &self.inner.pipeline
    }

    /// Get the user store
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.inner.users
    }
}
