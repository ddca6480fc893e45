//! Pluggable LLM provider trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK calls. This keeps the orchestration loop
//! decoupled from any particular LLM vendor.

use async_trait::async_trait;

use crate::error::RagError;
use crate::message::{ChatRequest, ChatResponse};

/// Trait for LLM provider backends.
///
/// Implementations handle the transport layer (HTTP, SDK calls, timeouts)
/// for a specific provider while presenting a uniform interface to the
/// loop. Providers are stateless from the loop's perspective and must be
/// safe for concurrent use by multiple simultaneous `ask` invocations.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`).
    fn name(&self) -> &'static str;

    /// Executes a chat completion request.
    ///
    /// The response either carries a final text answer (`tool_calls`
    /// empty) or one or more retrieval requests.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Model`] on API failures, timeouts, or parse
    /// errors. Providers leave the error's transcript empty; the loop
    /// attaches the current transcript before propagating.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RagError>;
}
