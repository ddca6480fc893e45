//! Concrete [`LlmProvider`](crate::provider::LlmProvider) implementations.

pub mod openai;

pub use openai::OpenAiProvider;
