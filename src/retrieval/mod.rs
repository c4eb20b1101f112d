//! Similarity search over the product catalog

pub mod search;

pub use search::Retriever;
