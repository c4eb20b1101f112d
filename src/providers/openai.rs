//! Hosted model provider client (OpenAI-compatible API)
//!
//! One client covers both capabilities the pipeline delegates to the
//! provider: turning text into vectors and turning (context, question) into
//! a grounded answer, optionally as an incremental token stream.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::generation::{AnswerStream, GenerationProvider, PromptMessage};

/// Hosted chat + embeddings client
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiClient {
    /// Create a new client with a bounded per-request wait
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn send_chat(&self, messages: &[PromptMessage], stream: bool) -> Result<reqwest::Response> {
        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages,
            temperature: self.config.temperature,
            stream,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_request(e, "chat completion"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Chat completion failed: HTTP {} - {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl GenerationProvider for OpenAiClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
        let response = self.send_chat(messages, false).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse completion: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::provider("Completion contained no choices"))
    }

    async fn complete_stream(&self, messages: &[PromptMessage]) -> Result<AnswerStream> {
        let response = self.send_chat(messages, true).await?;

        // Incremental SSE parse: the byte stream is buffered until a full
        // `data:` line is available, then each delta is yielded as one
        // fragment in provider order.
        let body = Box::pin(response.bytes_stream());
        let stream = futures_util::stream::try_unfold(
            (body, String::new()),
            |(mut body, mut buffer)| async move {
                loop {
                    if let Some(pos) = buffer.find('\n') {
                        let line: String = buffer.drain(..=pos).collect();
                        let line = line.trim();
                        let Some(payload) = line.strip_prefix("data:") else {
                            continue;
                        };
                        let payload = payload.trim();
                        if payload == "[DONE]" {
                            return Ok(None);
                        }
                        let chunk: StreamChunk = serde_json::from_str(payload)?;
                        let delta = chunk
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.delta.content)
                            .unwrap_or_default();
                        if !delta.is_empty() {
                            return Ok(Some((delta, (body, buffer))));
                        }
                        continue;
                    }

                    match body.next().await {
                        Some(Ok(bytes)) => buffer.push_str(&String::from_utf8_lossy(&bytes)),
                        Some(Err(e)) => return Err(Error::from_request(e, "chat completion stream")),
                        None => return Ok(None),
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }

    fn model(&self) -> &str {
        &self.config.chat_model
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::provider("Embedding response was empty"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.config.embed_model,
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_request(e, "embedding"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Embedding failed: HTTP {} - {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse embedding response: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(Error::Provider(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        // text-embedding-3-small
        1536
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_chunk_parses_delta_content() {
        let payload = r#"{"choices":[{"delta":{"content":"Hi"}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(payload).unwrap();
        assert_eq!(
            chunk.choices.into_iter().next().unwrap().delta.content,
            Some("Hi".to_string())
        );
    }

    #[test]
    fn stream_chunk_tolerates_empty_delta() {
        let payload = r#"{"choices":[{"delta":{}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(payload).unwrap();
        assert!(chunk.choices.into_iter().next().unwrap().delta.content.is_none());
    }

    #[test]
    fn prompt_messages_serialize_for_the_wire() {
        let json = serde_json::to_string(&PromptMessage::system("rules")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"rules"}"#);
    }
}
