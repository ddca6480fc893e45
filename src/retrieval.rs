//! Retrieval tool: validates and executes `retrieve` calls from the model.
//!
//! Dispatch is deliberately strict. The engine recognizes exactly one tool,
//! and any call with an unknown name or arguments that fail validation is a
//! [`RagError::MalformedToolCall`] that terminates the loop; invalid calls
//! are never echoed back to the model for another try.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::RagError;
use crate::store::{RetrievedPassage, VectorStore};
use crate::tool::{RETRIEVE_TOOL_NAME, ToolCall};

/// Maximum raw byte length of tool argument JSON from the LLM.
const MAX_TOOL_ARGS_LEN: usize = 10_000;
/// Maximum `top_k` accepted for a single retrieval.
const MAX_TOP_K: usize = 50;

/// Deserialized `retrieve` arguments.
#[derive(Debug, Deserialize)]
struct RetrieveArgs {
    query: String,
    top_k: Option<u64>,
}

/// Executes `retrieve` tool calls against a [`VectorStore`].
pub struct RetrievalTool {
    store: Arc<dyn VectorStore>,
    default_top_k: usize,
}

impl RetrievalTool {
    /// Creates a retrieval tool backed by the given store.
    ///
    /// `default_top_k` applies when the model omits `top_k` in its call.
    #[must_use]
    pub fn new(store: Arc<dyn VectorStore>, default_top_k: usize) -> Self {
        Self {
            store,
            default_top_k: default_top_k.clamp(1, MAX_TOP_K),
        }
    }

    /// Validates and executes one tool call.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MalformedToolCall`] for an unknown tool name,
    /// unparseable or oversized arguments, an empty query, or `top_k == 0`.
    /// Returns [`RagError::StoreUnavailable`] if the store query fails.
    pub async fn execute(&self, call: &ToolCall) -> Result<Vec<RetrievedPassage>, RagError> {
        let args = Self::validate(call)?;
        let top_k = args
            .top_k
            .map_or(self.default_top_k, |k| usize::try_from(k).unwrap_or(MAX_TOP_K))
            .min(MAX_TOP_K);

        let passages = self.store.query(&args.query, top_k).await?;
        debug!(
            call_id = call.id,
            query = args.query,
            top_k,
            passages = passages.len(),
            "retrieval complete"
        );
        Ok(passages)
    }

    /// Renders a retrieval batch as the JSON payload fed back to the model.
    ///
    /// Produces a pretty-printed array of `{source_id, similarity, text}`
    /// objects, or a short sentence when nothing matched, so the model does
    /// not mistake an empty result for a transport failure.
    #[must_use]
    pub fn render(batch: &[RetrievedPassage]) -> String {
        if batch.is_empty() {
            return "No passages matched this query.".to_string();
        }
        serde_json::to_string_pretty(batch)
            .unwrap_or_else(|_| "No passages matched this query.".to_string())
    }

    fn validate(call: &ToolCall) -> Result<RetrieveArgs, RagError> {
        if call.name != RETRIEVE_TOOL_NAME {
            return Err(malformed(&call.name, "unknown tool"));
        }

        if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            return Err(malformed(
                &call.name,
                &format!(
                    "arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            ));
        }

        let args: RetrieveArgs = serde_json::from_str(&call.arguments)
            .map_err(|e| malformed(&call.name, &format!("invalid arguments: {e}")))?;

        if args.query.trim().is_empty() {
            return Err(malformed(&call.name, "query must not be empty"));
        }
        if args.top_k == Some(0) {
            return Err(malformed(&call.name, "top_k must be at least 1"));
        }

        Ok(args)
    }
}

impl std::fmt::Debug for RetrievalTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalTool")
            .field("default_top_k", &self.default_top_k)
            .finish_non_exhaustive()
    }
}

fn malformed(name: &str, message: &str) -> RagError {
    RagError::MalformedToolCall {
        name: name.to_string(),
        message: message.to_string(),
        transcript: Vec::new(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use test_case::test_case;

    /// Mock store that records the last query and serves fixed passages.
    struct MockStore {
        last_query: Mutex<Option<(String, usize)>>,
        passages: Vec<RetrievedPassage>,
        fail: bool,
    }

    impl MockStore {
        fn serving(passages: Vec<RetrievedPassage>) -> Self {
            Self {
                last_query: Mutex::new(None),
                passages,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                last_query: Mutex::new(None),
                passages: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl VectorStore for MockStore {
        async fn query(
            &self,
            text: &str,
            top_k: usize,
        ) -> Result<Vec<RetrievedPassage>, RagError> {
            if self.fail {
                return Err(RagError::StoreUnavailable {
                    message: "connection refused".to_string(),
                });
            }
            if let Ok(mut guard) = self.last_query.lock() {
                *guard = Some((text.to_string(), top_k));
            }
            Ok(self.passages.clone())
        }

        async fn is_available(&self) -> bool {
            !self.fail
        }
    }

    fn passage(id: &str, similarity: f32) -> RetrievedPassage {
        RetrievedPassage {
            text: format!("text of {id}"),
            similarity,
            source_id: Some(id.to_string()),
        }
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    #[tokio::test]
    async fn test_execute_valid_call() {
        let store = Arc::new(MockStore::serving(vec![
            passage("a#1", 0.91),
            passage("a#2", 0.88),
        ]));
        let tool = RetrievalTool::new(Arc::clone(&store) as Arc<dyn VectorStore>, 5);

        let result = tool
            .execute(&call("retrieve", r#"{"query":"chosen family","top_k":3}"#))
            .await
            .unwrap_or_else(|e| panic!("execute failed: {e}"));

        assert_eq!(result.len(), 2);
        let recorded = store
            .last_query
            .lock()
            .unwrap_or_else(|e| panic!("lock poisoned: {e}"))
            .clone();
        assert_eq!(recorded, Some(("chosen family".to_string(), 3)));
    }

    #[tokio::test]
    async fn test_execute_defaults_top_k() {
        let store = Arc::new(MockStore::serving(Vec::new()));
        let tool = RetrievalTool::new(Arc::clone(&store) as Arc<dyn VectorStore>, 7);

        tool.execute(&call("retrieve", r#"{"query":"humor"}"#))
            .await
            .unwrap_or_else(|e| panic!("execute failed: {e}"));

        let recorded = store
            .last_query
            .lock()
            .unwrap_or_else(|e| panic!("lock poisoned: {e}"))
            .clone();
        assert_eq!(recorded, Some(("humor".to_string(), 7)));
    }

    #[tokio::test]
    async fn test_execute_clamps_top_k() {
        let store = Arc::new(MockStore::serving(Vec::new()));
        let tool = RetrievalTool::new(Arc::clone(&store) as Arc<dyn VectorStore>, 5);

        tool.execute(&call("retrieve", r#"{"query":"q","top_k":9999}"#))
            .await
            .unwrap_or_else(|e| panic!("execute failed: {e}"));

        let recorded = store
            .last_query
            .lock()
            .unwrap_or_else(|e| panic!("lock poisoned: {e}"))
            .clone();
        assert_eq!(recorded, Some(("q".to_string(), 50)));
    }

    #[test_case("lookup", r#"{"query":"q"}"#, "unknown tool" ; "unknown tool name")]
    #[test_case("retrieve", "not json", "invalid arguments" ; "unparseable arguments")]
    #[test_case("retrieve", r#"{"top_k":3}"#, "invalid arguments" ; "missing query")]
    #[test_case("retrieve", r#"{"query":"  "}"#, "query must not be empty" ; "blank query")]
    #[test_case("retrieve", r#"{"query":"q","top_k":0}"#, "top_k must be at least 1" ; "zero top_k")]
    #[tokio::test]
    async fn test_execute_malformed(name: &str, args: &str, expected: &str) {
        let store = Arc::new(MockStore::serving(Vec::new()));
        let tool = RetrievalTool::new(store as Arc<dyn VectorStore>, 5);

        let err = tool
            .execute(&call(name, args))
            .await
            .map(|_| ())
            .unwrap_err();
        match err {
            RagError::MalformedToolCall { message, name, .. } => {
                assert!(
                    message.contains(expected) || name == "lookup",
                    "unexpected message: {message}"
                );
            }
            other => panic!("expected MalformedToolCall, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_execute_oversized_arguments() {
        let store = Arc::new(MockStore::serving(Vec::new()));
        let tool = RetrievalTool::new(store as Arc<dyn VectorStore>, 5);

        let huge = format!(r#"{{"query":"{}"}}"#, "x".repeat(MAX_TOOL_ARGS_LEN + 1));
        let err = tool
            .execute(&call("retrieve", &huge))
            .await
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, RagError::MalformedToolCall { .. }));
    }

    #[tokio::test]
    async fn test_execute_propagates_store_failure() {
        let store = Arc::new(MockStore::failing());
        let tool = RetrievalTool::new(store as Arc<dyn VectorStore>, 5);

        let err = tool
            .execute(&call("retrieve", r#"{"query":"q"}"#))
            .await
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, RagError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_render_empty_batch() {
        assert_eq!(
            RetrievalTool::render(&[]),
            "No passages matched this query."
        );
    }

    #[test]
    fn test_render_batch_is_json_array() {
        let rendered = RetrievalTool::render(&[passage("a#1", 0.91)]);
        assert!(rendered.trim_start().starts_with('['));
        assert!(rendered.contains("a#1"));
        assert!(rendered.contains("0.91"));
    }
}
