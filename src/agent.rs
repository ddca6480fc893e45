//! The bounded retrieval-and-generation loop.
//!
//! Drives the model ↔ retrieval round-trip: sends the transcript to the
//! provider, executes any retrieval calls in the response, appends results,
//! and repeats until the model produces a final text answer or the
//! iteration budget is reached. On exhaustion the model is forced to
//! answer from accumulated context, so the budget is never a user-visible
//! failure.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::RagConfig;
use crate::error::RagError;
use crate::message::{
    ChatRequest, ChatResponse, assistant_tool_calls_message, system_message, tool_message,
    user_message,
};
use crate::prompt::FORCED_FINAL_INSTRUCTION;
use crate::provider::LlmProvider;
use crate::retrieval::RetrievalTool;
use crate::sources::SourceList;
use crate::store::{RetrievedPassage, VectorStore};
use crate::tool::retrieve_definition;

/// Maximum accepted question length in bytes.
const MAX_QUESTION_LEN: usize = 10_000;

/// The terminal output of one `ask` invocation.
#[derive(Debug, Clone)]
pub struct AgentResult {
    /// The model's final answer text.
    pub answer: String,
    /// Every passage surfaced to the model, deduplicated, in first-seen
    /// order across rounds.
    pub sources: Vec<RetrievedPassage>,
}

/// Retrieval-augmented question answering over a vector-indexed corpus.
///
/// The agent is stateless across calls: each `ask` owns its transcript and
/// source list and discards both on return. Concurrent `ask` invocations
/// share only the provider and store, both of which must be safe for
/// concurrent use.
pub struct RagAgent {
    provider: Arc<dyn LlmProvider>,
    store: Arc<dyn VectorStore>,
    retrieval: RetrievalTool,
    config: RagConfig,
}

impl RagAgent {
    /// Creates an agent from a provider, a vector store, and configuration.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn VectorStore>,
        config: RagConfig,
    ) -> Self {
        let retrieval = RetrievalTool::new(Arc::clone(&store), config.default_top_k);
        Self {
            provider,
            store,
            retrieval,
            config,
        }
    }

    /// Whether the backing vector store is reachable.
    ///
    /// Surrounding applications use this to gate access before the first
    /// question is accepted.
    pub async fn store_available(&self) -> bool {
        self.store.is_available().await
    }

    /// Answers a question, grounded in retrieved passages.
    ///
    /// Equivalent to [`Self::ask_cancellable`] with a token that never
    /// fires.
    ///
    /// # Errors
    ///
    /// See [`Self::ask_cancellable`].
    pub async fn ask(&self, question: &str) -> Result<AgentResult, RagError> {
        self.ask_cancellable(question, &CancellationToken::new())
            .await
    }

    /// Answers a question, checking `cancel` between rounds.
    ///
    /// Runs at most `max_iter` retrieval rounds. Each round sends the
    /// transcript to the provider with the `retrieve` tool enabled; a
    /// text-only response terminates the loop, a tool call is executed
    /// against the store and its result appended. If the budget is
    /// exhausted, one final call with tools disabled forces an answer
    /// from the accumulated context. Total provider calls never exceed
    /// `max_iter + 1`.
    ///
    /// # Errors
    ///
    /// * [`RagError::EmptyQuestion`] / [`RagError::QuestionTooLong`] on
    ///   precondition violations.
    /// * [`RagError::StoreUnavailable`] if a retrieval fails.
    /// * [`RagError::Model`] if a provider call fails or times out, with
    ///   the partial transcript attached.
    /// * [`RagError::MalformedToolCall`] if the model requests a tool the
    ///   engine does not recognize or supplies invalid arguments.
    /// * [`RagError::Cancelled`] if `cancel` fired between rounds.
    ///
    /// No partial [`AgentResult`] is returned on failure; accumulated
    /// state is discarded.
    pub async fn ask_cancellable(
        &self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<AgentResult, RagError> {
        if question.trim().is_empty() {
            return Err(RagError::EmptyQuestion);
        }
        if question.len() > MAX_QUESTION_LEN {
            return Err(RagError::QuestionTooLong {
                len: question.len(),
                max: MAX_QUESTION_LEN,
            });
        }

        let mut request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                system_message(self.config.system_prompt()),
                user_message(question),
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            tools: vec![retrieve_definition(self.config.default_top_k)],
        };
        let mut sources = SourceList::new();

        for round in 0..self.config.max_iter {
            if cancel.is_cancelled() {
                return Err(RagError::Cancelled);
            }

            let response = self.chat_bounded(&request).await?;

            // If no tool calls, we have a final answer
            if response.tool_calls.is_empty() {
                debug!(round, sources = sources.len(), "loop completed with final answer");
                return Ok(AgentResult {
                    answer: response.content,
                    sources: sources.into_passages(),
                });
            }

            debug!(
                round,
                tool_count = response.tool_calls.len(),
                "executing tool calls"
            );

            // Append the assistant message with tool calls
            request
                .messages
                .push(assistant_tool_calls_message(response.tool_calls.clone()));

            // Execute each tool call, merge passages, and append results
            for call in &response.tool_calls {
                let passages = self
                    .retrieval
                    .execute(call)
                    .await
                    .map_err(|e| e.with_transcript(&request.messages))?;
                let new = sources.merge(&passages);
                debug!(
                    call_id = call.id,
                    passages = passages.len(),
                    new,
                    "tool execution complete"
                );
                request
                    .messages
                    .push(tool_message(&call.id, &RetrievalTool::render(&passages)));
            }
        }

        // Budget exhausted: force a final answer from accumulated context
        if cancel.is_cancelled() {
            return Err(RagError::Cancelled);
        }

        warn!(
            max_iter = self.config.max_iter,
            sources = sources.len(),
            "iteration budget exhausted, forcing final answer"
        );
        request.messages.push(user_message(FORCED_FINAL_INSTRUCTION));
        request.tools.clear();

        let response = self.chat_bounded(&request).await?;
        Ok(AgentResult {
            answer: response.content,
            sources: sources.into_passages(),
        })
    }

    /// One provider call under the configured timeout, with the current
    /// transcript attached to any failure.
    async fn chat_bounded(&self, request: &ChatRequest) -> Result<ChatResponse, RagError> {
        let result = tokio::time::timeout(self.config.timeout, self.provider.chat(request))
            .await
            .map_err(|_| {
                RagError::model(format!(
                    "request timed out after {:?}",
                    self.config.timeout
                ))
            })
            .and_then(|r| r);
        result.map_err(|e| e.with_transcript(&request.messages))
    }
}

impl std::fmt::Debug for RagAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagAgent")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
