//! Grounded answer synthesis with incremental streaming

use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::cache::{response_key, ResponseCache};
use crate::providers::generation::{AnswerStream, GenerationProvider};
use crate::types::document::ScoredChunk;

/// Formats retrieved chunks plus the persona template into a grounded-answer
/// request and streams the model's fragments back as they arrive.
///
/// Fragments are forwarded through a bounded channel: the provider adapter
/// produces, the HTTP layer consumes. If the consumer goes away the
/// forwarding task stops and the upstream connection is dropped. On normal
/// completion the concatenated answer is written to the cache so an
/// identical (model, prompt) pair is served without another provider call.
pub struct AnswerSynthesizer {
    llm: Arc<dyn GenerationProvider>,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl AnswerSynthesizer {
    /// Create a synthesizer
    pub fn new(llm: Arc<dyn GenerationProvider>, cache: Option<Arc<dyn ResponseCache>>) -> Self {
        Self { llm, cache }
    }

    /// Stream a grounded answer for the question over the retrieved context
    pub async fn synthesize(&self, context: &[ScoredChunk], question: &str) -> Result<AnswerStream> {
        let messages = PromptBuilder::grounded_answer(context, question);
        let key = response_key(self.llm.model(), &messages);

        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(Some(hit)) => {
                    tracing::debug!("Answer served from cache");
                    let stream = futures_util::stream::once(async move { Ok::<_, Error>(hit) });
                    return Ok(Box::pin(stream));
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Cache lookup failed; treating as miss"),
            }
        }

        // Establish the stream before returning so a provider failure
        // surfaces as an error response instead of a broken partial stream.
        let mut upstream = self.llm.complete_stream(&messages).await?;

        let (tx, rx) = mpsc::channel::<Result<String>>(32);
        let cache = self.cache.clone();

        tokio::spawn(async move {
            let mut full = String::new();
            while let Some(item) = upstream.next().await {
                match item {
                    Ok(fragment) => {
                        full.push_str(&fragment);
                        // Send failure means the client disconnected; stop
                        // forwarding and drop the upstream connection.
                        if tx.send(Ok(fragment)).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
            }

            if let Some(cache) = cache {
                if let Err(e) = cache.put(&key, &full).await {
                    tracing::warn!(error = %e, "Failed to cache answer");
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}
