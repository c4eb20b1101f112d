//! Core types for the assistant service

pub mod chat;
pub mod document;
pub mod user;

pub use chat::{ChatMessage, Role};
pub use document::{DocumentChunk, ScoredChunk, UpsertItem};
pub use user::UserRecord;
