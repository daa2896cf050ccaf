use std::sync::Arc;

use vlab_core::rate_limit::RateLimiter;
use vlab_llm::LlmClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vlab_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upstream model used by the generation proxy.
    pub llm: Arc<dyn LlmClient>,
    /// Per-user generation quota.
    pub rate_limiter: Arc<dyn RateLimiter>,
}
