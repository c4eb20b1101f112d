//! History-aware query rewriting

use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::cache::{response_key, ResponseCache};
use crate::providers::generation::GenerationProvider;
use crate::types::chat::ChatMessage;

/// Rewrites a follow-up question plus prior turns into one self-contained
/// search query.
///
/// With no history there is nothing to fold in, so the question passes
/// through unchanged and no model call is made. Rewrites are cached by
/// (model, prompt); provider errors propagate with no retry here.
pub struct QueryRewriter {
    llm: Arc<dyn GenerationProvider>,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl QueryRewriter {
    /// Create a rewriter
    pub fn new(llm: Arc<dyn GenerationProvider>, cache: Option<Arc<dyn ResponseCache>>) -> Self {
        Self { llm, cache }
    }

    /// Produce a standalone search query for the pending question
    pub async fn rewrite(&self, history: &[ChatMessage], question: &str) -> Result<String> {
        if history.is_empty() {
            return Ok(question.trim().to_string());
        }

        let messages = PromptBuilder::rephrase_query(history, question);
        let key = response_key(self.llm.model(), &messages);

        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(Some(hit)) => {
                    tracing::debug!("Rewritten query served from cache");
                    return Ok(hit);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Cache lookup failed; treating as miss"),
            }
        }

        let raw = self.llm.complete(&messages).await?;

        // One query, not a transcript: collapse whatever the model returned
        // onto a single whitespace-normalized line.
        let query = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        tracing::debug!(query, "Question rewritten for retrieval");

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, &query).await {
                tracing::warn!(error = %e, "Failed to cache rewritten query");
            }
        }

        Ok(query)
    }
}
