//! Retrieval-augmented generation orchestration.
//!
//! `ragline` answers natural-language questions about a fixed corpus by
//! driving a bounded, tool-calling exchange between a language model and a
//! vector store. The model decides whether and how often to retrieve; the
//! engine enforces the iteration budget, aggregates retrieved passages
//! across rounds in first-seen order, and always terminates with an answer
//! plus the ordered source list.
//!
//! # Architecture
//!
//! ```text
//! caller → RagAgent::ask(question)
//!   ├── LlmProvider (chat completion, may request retrieval)
//!   ├── RetrievalTool (validates + executes `retrieve` calls)
//!   │   └── VectorStore (similarity query over a pre-built index)
//!   ├── SourceList (ordered, deduplicated passage aggregation)
//!   └── → AgentResult { answer, sources }
//! ```
//!
//! The engine is a library component invoked in-process by a presentation
//! layer; it owns no index, no embeddings, no credentials, and no UI.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ragline::{OpenAiProvider, RagAgent, RagConfig};
//! # use ragline::{RagError, RetrievedPassage, VectorStore};
//! # struct MyStore;
//! # #[async_trait::async_trait]
//! # impl VectorStore for MyStore {
//! #     async fn query(&self, _: &str, _: usize) -> Result<Vec<RetrievedPassage>, RagError> {
//! #         Ok(Vec::new())
//! #     }
//! #     async fn is_available(&self) -> bool { true }
//! # }
//!
//! # async fn run() -> Result<(), ragline::RagError> {
//! let config = RagConfig::from_env()?;
//! let provider = Arc::new(OpenAiProvider::new(&config));
//! let store = Arc::new(MyStore);
//! let agent = RagAgent::new(provider, store, config);
//!
//! let result = agent.ask("Why does the group feel like a chosen family?").await?;
//! println!("{}", result.answer);
//! for (i, source) in result.sources.iter().enumerate() {
//!     println!("[{}] ({:.3}) {}", i + 1, source.similarity, source.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod retrieval;
pub mod sources;
pub mod store;
pub mod tool;

// Re-export key types
pub use agent::{AgentResult, RagAgent};
pub use config::{RagConfig, RagConfigBuilder};
pub use error::RagError;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use provider::LlmProvider;
pub use providers::OpenAiProvider;
pub use retrieval::RetrievalTool;
pub use sources::SourceList;
pub use store::{RetrievedPassage, VectorStore};
pub use tool::{RETRIEVE_TOOL_NAME, ToolCall, ToolDefinition, retrieve_definition};
