//! Helpers for the workspace snapshot loader: per-module timeouts and a
//! bounded retry around the whole fan-out.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub use vlab_core::load_state::MAX_LOAD_ATTEMPTS;

/// A single workspace module that failed to load.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModuleLoadError {
    #[error("module '{module}' timed out after {}s", after.as_secs_f64())]
    TimedOut { module: &'static str, after: Duration },

    #[error("module '{module}' failed: {message}")]
    Failed { module: &'static str, message: String },
}

impl ModuleLoadError {
    pub fn module(&self) -> &'static str {
        match self {
            Self::TimedOut { module, .. } | Self::Failed { module, .. } => module,
        }
    }
}

/// Run one module's query under its own deadline.
pub async fn with_timeout<T, E, F>(
    module: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, ModuleLoadError>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ModuleLoadError::Failed {
            module,
            message: e.to_string(),
        }),
        Err(_) => Err(ModuleLoadError::TimedOut {
            module,
            after: limit,
        }),
    }
}

/// Call `op` until it succeeds or `max_attempts` calls have failed.
///
/// No backoff between attempts. `op` receives the 1-based attempt number.
pub async fn retry_bounded<T, E, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                tracing::warn!(attempt, max_attempts, error = %e, "Load attempt failed, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
