//! LLM access for the generation proxy.
//!
//! [`LlmClient`] is the seam the API depends on; [`AnthropicClient`] talks
//! to the Anthropic Messages API. Tests substitute their own client.

pub mod anthropic;
pub mod config;
pub mod error;

use async_trait::async_trait;
use vlab_core::generation::Prompt;

pub use anthropic::AnthropicClient;
pub use config::LlmConfig;
pub use error::LlmError;

/// A text-completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt and return the model's text reply.
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError>;
}
