use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vlab_core::rate_limit::{InMemoryRateLimiter, RateLimiter};
use vlab_db::repositories::{PgRateLimiter, RateLimitRepo};
use vlab_llm::{AnthropicClient, LlmConfig};

use vlab_api::config::{LogFormat, RateLimitBackend, ServerConfig};
use vlab_api::router::build_app_router;
use vlab_api::state::AppState;

/// Key namespace for generation counters in `rate_limit_counters`.
const GENERATE_LIMIT_NAMESPACE: &str = "generate";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vlab_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let llm_config = LlmConfig::from_env();
    tracing::info!(model = %llm_config.model, "Loaded LLM configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vlab_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    vlab_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    vlab_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- LLM client ---
    let llm = AnthropicClient::new(llm_config).expect("Failed to build LLM HTTP client");

    // --- Rate limiter ---
    let policy = config.rate_limit;
    let window_secs = policy.window.as_secs();
    let mut purge_handle = None;
    let rate_limiter: Arc<dyn RateLimiter> = match config.rate_limit_backend {
        RateLimitBackend::Memory => {
            tracing::info!(quota = policy.quota, window_secs, "Using in-memory rate limiter");
            Arc::new(InMemoryRateLimiter::new(policy))
        }
        RateLimitBackend::Postgres => {
            tracing::info!(quota = policy.quota, window_secs, "Using PostgreSQL rate limiter");
            purge_handle = Some(spawn_counter_purge(pool.clone(), policy.window));
            Arc::new(PgRateLimiter::new(
                pool.clone(),
                policy,
                GENERATE_LIMIT_NAMESPACE,
            ))
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        llm: Arc::new(llm),
        rate_limiter,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(handle) = purge_handle {
        handle.abort();
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Rate-limit purge task stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Delete expired rate-limit counters once per window.
fn spawn_counter_purge(pool: vlab_db::DbPool, window: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(window);
        loop {
            ticker.tick().await;
            match RateLimitRepo::purge_expired(&pool, window).await {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "Purged expired rate-limit counters"),
                Err(e) => tracing::warn!(error = %e, "Rate-limit counter purge failed"),
            }
        }
    })
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
