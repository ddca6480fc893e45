//! Error taxonomy for the orchestration engine.
//!
//! One flat enum covers the whole crate. Failures that occur mid-loop
//! (`Model`, `MalformedToolCall`) carry the partial transcript so callers
//! can diagnose what the model saw before things went wrong. The engine
//! never retries internally; retry policy belongs to the provider layer.

use thiserror::Error;

use crate::message::ChatMessage;

/// Errors produced by the orchestration engine.
#[derive(Debug, Error)]
pub enum RagError {
    /// The question was empty or whitespace-only.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// The question exceeded the maximum accepted length.
    #[error("question exceeds maximum length ({len} bytes, max {max})")]
    QuestionTooLong {
        /// Byte length of the rejected question.
        len: usize,
        /// Maximum accepted byte length.
        max: usize,
    },

    /// No API key was provided or found in the environment.
    #[error("no API key found; set OPENAI_API_KEY or pass one explicitly")]
    ApiKeyMissing,

    /// The vector store could not be reached or the query failed.
    #[error("vector store unavailable: {message}")]
    StoreUnavailable {
        /// Underlying store failure description.
        message: String,
    },

    /// The language model call failed (timeout, quota, malformed response).
    #[error("model call failed ({} transcript turns): {message}", .transcript.len())]
    Model {
        /// Provider-reported failure description.
        message: String,
        /// Transcript state at the time of failure, for diagnostics.
        transcript: Vec<ChatMessage>,
    },

    /// The model requested a tool call the engine does not recognize,
    /// or supplied arguments that fail validation.
    #[error("malformed tool call '{name}': {message}")]
    MalformedToolCall {
        /// Tool name as the model emitted it.
        name: String,
        /// What failed validation.
        message: String,
        /// Transcript state at the time of failure, for diagnostics.
        transcript: Vec<ChatMessage>,
    },

    /// The external cancellation signal fired between retrieval rounds.
    #[error("cancelled between retrieval rounds")]
    Cancelled,
}

impl RagError {
    /// Attaches the given transcript to variants that carry one.
    ///
    /// Providers construct `Model` errors without transcript context;
    /// the loop stamps the current transcript on before propagating.
    #[must_use]
    pub fn with_transcript(self, messages: &[ChatMessage]) -> Self {
        match self {
            Self::Model {
                message,
                transcript,
            } if transcript.is_empty() => Self::Model {
                message,
                transcript: messages.to_vec(),
            },
            Self::MalformedToolCall {
                name,
                message,
                transcript,
            } if transcript.is_empty() => Self::MalformedToolCall {
                name,
                message,
                transcript: messages.to_vec(),
            },
            other => other,
        }
    }

    /// Creates a `Model` error with no transcript attached yet.
    #[must_use]
    pub const fn model(message: String) -> Self {
        Self::Model {
            message,
            transcript: Vec::new(),
        }
    }
}
