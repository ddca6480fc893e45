//! Engine configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::time::Duration;

use crate::error::RagError;

/// Default model for answer generation.
const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default maximum retrieval rounds per question.
const DEFAULT_MAX_ITER: usize = 3;
/// Default passages per retrieval when the model omits `top_k`.
const DEFAULT_TOP_K: usize = 5;
/// Default maximum tokens for generated answers.
const DEFAULT_MAX_TOKENS: u32 = 2048;
/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the orchestration engine.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model identifier used for every generation call.
    pub model: String,
    /// Maximum retrieval rounds per question (≥ 1). One additional
    /// provider call is made if the budget is exhausted.
    pub max_iter: usize,
    /// Passages per retrieval when the model omits `top_k`.
    pub default_top_k: usize,
    /// Maximum tokens per generated response.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout.
    pub timeout: Duration,
    /// System prompt override; `None` uses the compiled-in default.
    pub system_prompt: Option<String>,
}

impl RagConfig {
    /// Creates a new builder for `RagConfig`.
    #[must_use]
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, RagError> {
        Self::builder().from_env().build()
    }

    /// The effective system prompt.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(crate::prompt::DEFAULT_SYSTEM_PROMPT)
    }
}

/// Builder for [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_iter: Option<usize>,
    default_top_k: Option<usize>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Option<Duration>,
    system_prompt: Option<String>,
}

impl RagConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("RAGLINE_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("RAGLINE_BASE_URL"))
                .ok();
        }
        if self.model.is_none() {
            self.model = std::env::var("RAGLINE_MODEL").ok();
        }
        if self.max_iter.is_none() {
            self.max_iter = std::env::var("RAGLINE_MAX_ITER")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.default_top_k.is_none() {
            self.default_top_k = std::env::var("RAGLINE_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the maximum retrieval rounds (clamped to ≥ 1 at build time).
    #[must_use]
    pub const fn max_iter(mut self, n: usize) -> Self {
        self.max_iter = Some(n);
        self
    }

    /// Sets the default `top_k` per retrieval (clamped to ≥ 1 at build time).
    #[must_use]
    pub const fn default_top_k(mut self, n: usize) -> Self {
        self.default_top_k = Some(n);
        self
    }

    /// Sets the maximum tokens per response.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the system prompt override.
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Builds the [`RagConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<RagConfig, RagError> {
        let api_key = self.api_key.ok_or(RagError::ApiKeyMissing)?;

        Ok(RagConfig {
            api_key,
            base_url: self.base_url,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_iter: self.max_iter.unwrap_or(DEFAULT_MAX_ITER).max(1),
            default_top_k: self.default_top_k.unwrap_or(DEFAULT_TOP_K).max(1),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.temperature.unwrap_or(0.0),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            system_prompt: self.system_prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_builder_defaults() {
        let config = RagConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_iter, DEFAULT_MAX_ITER);
        assert_eq!(config.default_top_k, DEFAULT_TOP_K);
        assert!(config.base_url.is_none());
        assert_eq!(
            config.system_prompt(),
            crate::prompt::DEFAULT_SYSTEM_PROMPT
        );
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = RagConfig::builder().build();
        assert!(matches!(result, Err(RagError::ApiKeyMissing)));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = RagConfig::builder()
            .api_key("key")
            .model("gpt-4o")
            .max_iter(5)
            .default_top_k(10)
            .temperature(0.3)
            .timeout(Duration::from_secs(30))
            .system_prompt("You answer questions about Friends.")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_iter, 5);
        assert_eq!(config.default_top_k, 10);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.system_prompt(),
            "You answer questions about Friends."
        );
    }

    #[test_case(0, 1 ; "zero clamps to one")]
    #[test_case(1, 1 ; "one stays one")]
    #[test_case(4, 4 ; "larger values pass through")]
    fn test_max_iter_clamped(set: usize, expected: usize) {
        let config = RagConfig::builder()
            .api_key("key")
            .max_iter(set)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.max_iter, expected);
    }

    #[test]
    fn test_default_top_k_clamped() {
        let config = RagConfig::builder()
            .api_key("key")
            .default_top_k(0)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.default_top_k, 1);
    }
}
