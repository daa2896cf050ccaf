//! Shared fixed-window counters in the `rate_limit_counters` table.
//!
//! [`PgRateLimiter`] is the multi-instance counterpart of the in-memory
//! limiter: every server instance counts against the same row, so the
//! quota holds no matter which instance serves the request.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use vlab_core::error::CoreError;
use vlab_core::rate_limit::{decide, RateDecision, RateLimitPolicy, RateLimiter};
use vlab_core::types::DbId;

/// Counter state after one hit.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CounterHit {
    pub count: i32,
    /// Seconds since the current window opened.
    pub elapsed_secs: f64,
}

pub struct RateLimitRepo;

impl RateLimitRepo {
    /// Count one hit against `key`, opening a fresh window when the stored
    /// one is older than `window`. Runs as a single atomic upsert.
    pub async fn hit(
        pool: &PgPool,
        key: &str,
        window: Duration,
    ) -> Result<CounterHit, sqlx::Error> {
        sqlx::query_as::<_, CounterHit>(
            "INSERT INTO rate_limit_counters (key, count, window_start) \
             VALUES ($1, 1, NOW()) \
             ON CONFLICT (key) DO UPDATE SET \
                count = CASE \
                    WHEN rate_limit_counters.window_start <= NOW() - make_interval(secs => $2) \
                    THEN 1 ELSE rate_limit_counters.count + 1 END, \
                window_start = CASE \
                    WHEN rate_limit_counters.window_start <= NOW() - make_interval(secs => $2) \
                    THEN NOW() ELSE rate_limit_counters.window_start END \
             RETURNING count, EXTRACT(EPOCH FROM (NOW() - window_start))::float8 AS elapsed_secs",
        )
        .bind(key)
        .bind(window.as_secs_f64())
        .fetch_one(pool)
        .await
    }

    /// Delete counters whose window ended. Returns the number removed.
    pub async fn purge_expired(pool: &PgPool, window: Duration) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM rate_limit_counters WHERE window_start <= NOW() - make_interval(secs => $1)",
        )
        .bind(window.as_secs_f64())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

/// [`RateLimiter`] backed by [`RateLimitRepo`].
#[derive(Debug, Clone)]
pub struct PgRateLimiter {
    pool: PgPool,
    policy: RateLimitPolicy,
    namespace: &'static str,
}

impl PgRateLimiter {
    /// `namespace` prefixes every key so separate limits can share the table.
    pub fn new(pool: PgPool, policy: RateLimitPolicy, namespace: &'static str) -> Self {
        Self {
            pool,
            policy,
            namespace,
        }
    }

    fn key(&self, id: DbId) -> String {
        format!("{}:{id}", self.namespace)
    }
}

#[async_trait]
impl RateLimiter for PgRateLimiter {
    async fn check(&self, key: DbId) -> Result<RateDecision, CoreError> {
        let hit = RateLimitRepo::hit(&self.pool, &self.key(key), self.policy.window)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Rate limit counter update failed");
                CoreError::Internal("rate limiter unavailable".to_string())
            })?;

        let count = u32::try_from(hit.count).unwrap_or(u32::MAX);
        let elapsed = Duration::try_from_secs_f64(hit.elapsed_secs.max(0.0)).unwrap_or_default();
        Ok(decide(count, &self.policy, elapsed))
    }
}
