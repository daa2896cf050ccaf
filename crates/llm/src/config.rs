//! LLM client configuration loaded from environment variables.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 4_096;
pub const DEFAULT_TIMEOUT_SECS: u64 = 55;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Load from environment variables.
    ///
    /// | Env var            | Default                 |
    /// |--------------------|-------------------------|
    /// | `LLM_API_KEY`      | (required)              |
    /// | `LLM_API_URL`      | Anthropic messages URL  |
    /// | `LLM_MODEL`        | [`DEFAULT_MODEL`]       |
    /// | `LLM_MAX_TOKENS`   | `4096`                  |
    /// | `LLM_TIMEOUT_SECS` | `55`                    |
    ///
    /// # Panics
    ///
    /// Panics if `LLM_API_KEY` is unset or a numeric variable does not parse.
    pub fn from_env() -> Self {
        let api_key = std::env::var("LLM_API_KEY").expect("LLM_API_KEY must be set");
        let api_url =
            std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens: u32 = std::env::var("LLM_MAX_TOKENS")
            .unwrap_or_else(|_| DEFAULT_MAX_TOKENS.to_string())
            .parse()
            .expect("LLM_MAX_TOKENS must be a valid u32");

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            api_url,
            model,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
