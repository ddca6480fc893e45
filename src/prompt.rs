//! Compiled-in prompts for the orchestration loop.

/// Default system prompt for grounded question answering.
///
/// Overridable per-engine via
/// [`RagConfigBuilder::system_prompt`](crate::config::RagConfigBuilder::system_prompt)
/// so the surrounding application can theme the assistant to its corpus.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a research assistant answering questions about a fixed corpus. \
Use the `retrieve` tool to search the corpus for relevant passages before \
answering. Ground every claim in retrieved passages and cite them by their \
position in the order retrieved, e.g. [1], [2]. If retrieval returns \
nothing relevant, say so rather than speculating. Retrieve again with a \
refined query when the first results are insufficient.";

/// Instruction appended when the iteration budget is exhausted.
///
/// Sent with tools disabled, so the only thing the model can do is answer
/// from the context already in the transcript.
pub const FORCED_FINAL_INSTRUCTION: &str = "\
No further retrieval is available. Answer the original question now using \
only the passages already retrieved above. If they are insufficient, give \
the best grounded answer you can and state what is missing.";
