//! Response cache trait and cache keying

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::providers::generation::PromptMessage;

/// Trait for an opaque key/value response cache
///
/// The cache is best-effort: callers treat a failed lookup as a miss and a
/// failed write as a no-op, logging either. Eviction is whatever the backing
/// store enforces.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a cached response
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a response
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Cache key for a model call: sha256 over the model identity and the
/// rendered prompt. Identical (model, prompt) pairs hit the same entry.
pub fn response_key(model: &str, messages: &[PromptMessage]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    for message in messages {
        hasher.update([0u8]);
        hasher.update(format!("{:?}", message.role).as_bytes());
        hasher.update([0u8]);
        hasher.update(message.content.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_prompts_share_a_key() {
        let messages = vec![
            PromptMessage::system("persona"),
            PromptMessage::user("question"),
        ];
        assert_eq!(
            response_key("gpt-4o-mini", &messages),
            response_key("gpt-4o-mini", &messages)
        );
    }

    #[test]
    fn model_and_content_change_the_key() {
        let messages = vec![PromptMessage::user("question")];
        let base = response_key("gpt-4o-mini", &messages);
        assert_ne!(base, response_key("gpt-4o", &messages));
        assert_ne!(
            base,
            response_key("gpt-4o-mini", &[PromptMessage::user("other")])
        );
    }
}
