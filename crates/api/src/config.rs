use std::time::Duration;

use vlab_core::rate_limit::{RateLimitPolicy, DEFAULT_QUOTA, DEFAULT_WINDOW_SECS};

use crate::auth::jwt::JwtConfig;

/// Where generation rate-limit counters live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitBackend {
    /// Per-process map. Counters are not shared between instances.
    Memory,
    /// The `rate_limit_counters` table, shared by every instance.
    Postgres,
}

impl RateLimitBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "postgres" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT` (`pretty` | `json`, default `pretty`).
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Token verification settings.
    pub jwt: JwtConfig,
    /// Generation quota per user.
    pub rate_limit: RateLimitPolicy,
    pub rate_limit_backend: RateLimitBackend,
    /// Per-module timeout for the workspace snapshot loader (default: `10`).
    pub workspace_module_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `60`                    |
    /// | `RATE_LIMIT_REQUESTS`           | `20`                    |
    /// | `RATE_LIMIT_WINDOW_SECS`        | `60`                    |
    /// | `RATE_LIMIT_BACKEND`            | `memory`                |
    /// | `WORKSPACE_MODULE_TIMEOUT_SECS` | `10`                    |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let quota: u32 = std::env::var("RATE_LIMIT_REQUESTS")
            .unwrap_or_else(|_| DEFAULT_QUOTA.to_string())
            .parse()
            .expect("RATE_LIMIT_REQUESTS must be a valid u32");

        let window_secs: u64 = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| DEFAULT_WINDOW_SECS.to_string())
            .parse()
            .expect("RATE_LIMIT_WINDOW_SECS must be a valid u64");
        assert!(window_secs > 0, "RATE_LIMIT_WINDOW_SECS must be positive");

        let rate_limit_backend = std::env::var("RATE_LIMIT_BACKEND")
            .map(|raw| {
                RateLimitBackend::parse(&raw)
                    .unwrap_or_else(|| panic!("RATE_LIMIT_BACKEND must be 'memory' or 'postgres', got '{raw}'"))
            })
            .unwrap_or(RateLimitBackend::Memory);

        let workspace_module_timeout_secs: u64 = std::env::var("WORKSPACE_MODULE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("WORKSPACE_MODULE_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitPolicy {
                quota,
                window: Duration::from_secs(window_secs),
            },
            rate_limit_backend,
            workspace_module_timeout_secs,
        }
    }

    pub fn workspace_module_timeout(&self) -> Duration {
        Duration::from_secs(self.workspace_module_timeout_secs)
    }
}
