//! Provider abstractions for embeddings, generation, vector search, and
//! response caching
//!
//! Every external collaborator sits behind a trait so the pipeline can be
//! constructed over hosted services in production and in-memory fakes in
//! tests.

pub mod cache;
pub mod embedding;
pub mod generation;
pub mod memory;
pub mod openai;
pub mod pinecone;
pub mod upstash;
pub mod vector_index;

pub use cache::{response_key, ResponseCache};
pub use embedding::EmbeddingProvider;
pub use generation::{AnswerStream, GenerationProvider, PromptMessage, PromptRole};
pub use vector_index::VectorIndexProvider;
