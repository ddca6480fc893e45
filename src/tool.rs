//! Tool type definitions for function-calling.
//!
//! The engine exposes a single tool to the model: `retrieve`, which runs a
//! similarity query against the vector store. The definition carries a
//! JSON Schema so `OpenAI`-compatible backends can validate arguments on
//! their side; the engine still validates on execution.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Name of the retrieval tool as declared to the model.
pub const RETRIEVE_TOOL_NAME: &str = "retrieve";

/// A tool definition that can be sent to an LLM for function-calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the dispatch check in the retrieval tool).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// Defines the `retrieve` tool.
///
/// `default_top_k` is advertised in the schema so the model knows what it
/// gets when it omits `top_k`.
#[must_use]
pub fn retrieve_definition(default_top_k: usize) -> ToolDefinition {
    ToolDefinition {
        name: RETRIEVE_TOOL_NAME.to_string(),
        description: "Search the knowledge base for passages relevant to a query. \
                       Returns passages ranked by similarity, best match first. \
                       Call again with a refined query if the first results are \
                       insufficient to answer."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query text."
                },
                "top_k": {
                    "type": "integer",
                    "minimum": 1,
                    "description": format!(
                        "Number of passages to retrieve. Defaults to {default_top_k}."
                    ),
                    "default": default_top_k
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
    }
}
