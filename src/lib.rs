//! retail-rag: retrieval-augmented shopping assistant service
//!
//! A chat endpoint that rewrites follow-up questions into standalone search
//! queries using conversation history, retrieves matching product chunks from
//! a hosted vector index, and streams a grounded answer from a hosted
//! language model. A companion ingestion binary parses a product catalog CSV,
//! chunks it, and populates the index.
//!
//! All external capabilities (embedding, generation, vector search, response
//! caching, user records) sit behind traits in [`providers`] and [`users`] so
//! that the pipeline can be exercised against in-memory fakes.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;
pub mod users;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use pipeline::ConversationPipeline;
pub use types::{
    chat::{ChatMessage, Role},
    document::{DocumentChunk, ScoredChunk},
    user::UserRecord,
};
