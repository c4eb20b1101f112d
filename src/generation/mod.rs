//! Prompt construction for rewriting and grounded answering

pub mod prompt;

pub use prompt::PromptBuilder;
