use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("upstream timed out")]
    Timeout,

    #[error("http {status}: {body}")]
    Http { status: u16, body: String },

    #[error("upstream rate limited")]
    RateLimited,

    #[error("invalid api key")]
    InvalidApiKey,

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("model returned no text")]
    EmptyResponse,
}
