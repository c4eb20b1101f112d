//! The conversational pipeline: rewrite, retrieve, synthesize
//!
//! All request-scoped state (history, rewritten query, retrieved context)
//! lives on the stack for the duration of one call; nothing is shared
//! between requests.

pub mod rewriter;
pub mod synthesis;

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::cache::ResponseCache;
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::generation::{AnswerStream, GenerationProvider};
use crate::providers::vector_index::VectorIndexProvider;
use crate::retrieval::Retriever;
use crate::types::chat::{split_conversation, ChatMessage};

pub use rewriter::QueryRewriter;
pub use synthesis::AnswerSynthesizer;

/// Orchestrates one chat turn: split the conversation, rewrite the pending
/// question against its history, retrieve catalog context, and stream a
/// grounded answer.
///
/// Stages run strictly sequentially; the route above this is the single
/// recovery boundary, so every error propagates out of [`handle`] untouched.
pub struct ConversationPipeline {
    rewriter: QueryRewriter,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
}

impl ConversationPipeline {
    /// Assemble the pipeline from injected providers
    pub fn new(
        llm: Arc<dyn GenerationProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        cache: Option<Arc<dyn ResponseCache>>,
        retrieval: &RetrievalConfig,
    ) -> Self {
        Self {
            rewriter: QueryRewriter::new(llm.clone(), cache.clone()),
            retriever: Retriever::new(embedder, index, retrieval),
            synthesizer: AnswerSynthesizer::new(llm, cache),
        }
    }

    /// Handle one conversation request, producing a streamed answer
    pub async fn handle(&self, messages: &[ChatMessage]) -> Result<AnswerStream> {
        let (history, question) = split_conversation(messages)?;
        tracing::info!(history_turns = history.len(), "Handling chat turn");

        let query = self.rewriter.rewrite(history, question).await?;
        let context = self.retriever.retrieve(&query).await?;
        tracing::info!(chunks = context.len(), "Context ready, synthesizing answer");

        self.synthesizer.synthesize(&context, question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::generation::PromptMessage;
    use crate::providers::memory::{MemoryCache, MemoryVectorIndex};
    use crate::types::document::{DocumentChunk, UpsertItem};
    use async_trait::async_trait;
    use futures_util::StreamExt;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Scripted model: records every request, answers from a fixed script
    struct ScriptedLlm {
        completion: String,
        fragments: Vec<String>,
        complete_calls: Mutex<Vec<Vec<PromptMessage>>>,
        stream_calls: Mutex<Vec<Vec<PromptMessage>>>,
    }

    impl ScriptedLlm {
        fn new(completion: &str, fragments: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                completion: completion.to_string(),
                fragments: fragments.iter().map(|s| s.to_string()).collect(),
                complete_calls: Mutex::new(Vec::new()),
                stream_calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerationProvider for ScriptedLlm {
        async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
            self.complete_calls.lock().push(messages.to_vec());
            Ok(self.completion.clone())
        }

        async fn complete_stream(&self, messages: &[PromptMessage]) -> Result<AnswerStream> {
            self.stream_calls.lock().push(messages.to_vec());
            let fragments = self.fragments.clone();
            Ok(Box::pin(futures_util::stream::iter(
                fragments.into_iter().map(Ok),
            )))
        }

        fn model(&self) -> &str {
            "scripted"
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Embeds text onto a snack/coffee axis so retrieval is deterministic
    struct TopicEmbedder {
        queries: Mutex<Vec<String>>,
    }

    impl TopicEmbedder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for TopicEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.queries.lock().push(text.to_string());
            let lower = text.to_lowercase();
            Ok(vec![
                lower.contains("snack") as u8 as f32,
                lower.contains("coffee") as u8 as f32,
            ])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "topic"
        }
    }

    async fn seeded_index() -> Arc<MemoryVectorIndex> {
        let index = Arc::new(MemoryVectorIndex::new());
        let items = vec![
            UpsertItem {
                id: "snack".to_string(),
                embedding: vec![1.0, 0.0],
                chunk: DocumentChunk::new(
                    "Sub Category: snacks\nTitle: Trail Mix\nPrice: $9.99",
                    HashMap::new(),
                ),
            },
            UpsertItem {
                id: "coffee".to_string(),
                embedding: vec![0.0, 1.0],
                chunk: DocumentChunk::new(
                    "Sub Category: coffee\nTitle: Dark Roast\nPrice: $14.99",
                    HashMap::new(),
                ),
            },
        ];
        index.upsert(&items, "assistant").await.unwrap();
        index
    }

    fn retrieval_config(top_k: usize) -> RetrievalConfig {
        RetrievalConfig {
            namespace: "assistant".to_string(),
            top_k,
        }
    }

    async fn collect(stream: AnswerStream) -> String {
        stream
            .map(|item| item.unwrap())
            .collect::<Vec<_>>()
            .await
            .concat()
    }

    #[tokio::test]
    async fn first_turn_skips_the_rewrite_model_call() {
        let llm = ScriptedLlm::new("unused", &["Try ", "Trail Mix!"]);
        let embedder = TopicEmbedder::new();
        let pipeline = ConversationPipeline::new(
            llm.clone(),
            embedder.clone(),
            seeded_index().await,
            None,
            &retrieval_config(1),
        );

        let messages = vec![ChatMessage::user("Show me cheap snacks")];
        let answer = collect(pipeline.handle(&messages).await.unwrap()).await;

        assert_eq!(answer, "Try Trail Mix!");
        // No history, no rewrite: the retriever sees the question verbatim.
        assert!(llm.complete_calls.lock().is_empty());
        assert_eq!(embedder.queries.lock().as_slice(), ["Show me cheap snacks"]);
    }

    #[tokio::test]
    async fn synthesis_prompt_contains_only_retrieved_context() {
        let llm = ScriptedLlm::new("unused", &["ok"]);
        let pipeline = ConversationPipeline::new(
            llm.clone(),
            TopicEmbedder::new(),
            seeded_index().await,
            None,
            &retrieval_config(1),
        );

        let messages = vec![ChatMessage::user("Show me cheap snacks")];
        collect(pipeline.handle(&messages).await.unwrap()).await;

        let stream_calls = llm.stream_calls.lock();
        let system = &stream_calls[0][0].content;
        assert!(system.contains("Trail Mix"));
        assert!(!system.contains("Dark Roast"));
    }

    #[tokio::test]
    async fn follow_up_is_rewritten_onto_one_line() {
        let llm = ScriptedLlm::new("snacks under\n$10", &["ok"]);
        let embedder = TopicEmbedder::new();
        let pipeline = ConversationPipeline::new(
            llm.clone(),
            embedder.clone(),
            seeded_index().await,
            None,
            &retrieval_config(1),
        );

        let messages = vec![
            ChatMessage::user("Show me snacks"),
            ChatMessage::assistant("Here are some snacks..."),
            ChatMessage::user("Anything under $10?"),
        ];
        collect(pipeline.handle(&messages).await.unwrap()).await;

        assert_eq!(llm.complete_calls.lock().len(), 1);
        let queries = embedder.queries.lock();
        assert_eq!(queries.as_slice(), ["snacks under $10"]);
        assert!(!queries[0].contains('\n'));
    }

    #[tokio::test]
    async fn repeated_question_is_served_from_cache() {
        let llm = ScriptedLlm::new("unused", &["Try ", "Trail Mix!"]);
        let cache = Arc::new(MemoryCache::new());
        let pipeline = ConversationPipeline::new(
            llm.clone(),
            TopicEmbedder::new(),
            seeded_index().await,
            Some(cache),
            &retrieval_config(1),
        );

        let messages = vec![ChatMessage::user("Show me cheap snacks")];
        let first = collect(pipeline.handle(&messages).await.unwrap()).await;
        let second = collect(pipeline.handle(&messages).await.unwrap()).await;

        assert_eq!(first, second);
        assert_eq!(llm.stream_calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn invalid_conversation_is_rejected_before_any_provider_call() {
        let llm = ScriptedLlm::new("unused", &["ok"]);
        let embedder = TopicEmbedder::new();
        let pipeline = ConversationPipeline::new(
            llm.clone(),
            embedder.clone(),
            seeded_index().await,
            None,
            &retrieval_config(1),
        );

        assert!(pipeline.handle(&[]).await.is_err());
        assert!(llm.complete_calls.lock().is_empty());
        assert!(llm.stream_calls.lock().is_empty());
        assert!(embedder.queries.lock().is_empty());
    }
}
