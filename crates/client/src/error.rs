use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient) and the stores.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("api error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A 2xx body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no failed load to retry")]
    NothingToRetry,

    #[error("gave up after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl ClientError {
    /// HTTP status of an [`Api`](Self::Api) error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
