//! Per-user fixed-window rate limiting.
//!
//! [`FixedWindow`] holds the window arithmetic with an injected clock so it
//! can be tested deterministically. [`RateLimiter`] is the seam between the
//! HTTP layer and the counter store: [`InMemoryRateLimiter`] keeps counters
//! in process, while the database crate provides a shared PostgreSQL-backed
//! store for multi-instance deployments.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;

/// Default number of requests allowed per window.
pub const DEFAULT_QUOTA: u32 = 20;

/// Default window length in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Number of tracked keys above which expired windows are swept.
pub const SWEEP_THRESHOLD: usize = 10_000;

/// Quota and window length applied to every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub quota: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            quota: DEFAULT_QUOTA,
            window: Duration::from_secs(DEFAULT_WINDOW_SECS),
        }
    }
}

/// Outcome of counting one request against a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Convert a `Limited` decision into the matching [`CoreError`].
    pub fn into_result(self) -> Result<u32, CoreError> {
        match self {
            Self::Allowed { remaining } => Ok(remaining),
            Self::Limited { retry_after } => Err(CoreError::RateLimited {
                // Round up so clients never retry a moment too early.
                retry_after_secs: retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0),
            }),
        }
    }
}

/// Decide a request given the post-increment `count` for the current window
/// and the time `elapsed` since that window opened.
pub fn decide(count: u32, policy: &RateLimitPolicy, elapsed: Duration) -> RateDecision {
    if count > policy.quota {
        RateDecision::Limited {
            retry_after: policy.window.saturating_sub(elapsed),
        }
    } else {
        RateDecision::Allowed {
            remaining: policy.quota - count,
        }
    }
}

/// One key's counter: when its window opened and how many hits it has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWindow {
    started_at: Instant,
    count: u32,
}

impl FixedWindow {
    pub fn open(now: Instant) -> Self {
        Self {
            started_at: now,
            count: 0,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_expired(&self, policy: &RateLimitPolicy, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= policy.window
    }

    /// Count one request at `now`, resetting first if the window elapsed.
    pub fn hit(&mut self, policy: &RateLimitPolicy, now: Instant) -> RateDecision {
        if self.is_expired(policy, now) {
            *self = Self::open(now);
        }
        self.count = self.count.saturating_add(1);
        decide(
            self.count,
            policy,
            now.saturating_duration_since(self.started_at),
        )
    }
}

/// Counter store consulted once per rate-limited request.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, key: Uuid) -> Result<RateDecision, CoreError>;
}

/// In-process counter store.
///
/// Counters are not shared between server instances; use the PostgreSQL
/// store when running more than one.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    policy: RateLimitPolicy,
    windows: Mutex<HashMap<Uuid, FixedWindow>>,
}

impl InMemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request for `key` at an explicit instant.
    pub fn check_at(&self, key: Uuid, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= SWEEP_THRESHOLD {
            let policy = self.policy;
            windows.retain(|_, w| !w.is_expired(&policy, now));
        }

        windows
            .entry(key)
            .or_insert_with(|| FixedWindow::open(now))
            .hit(&self.policy, now)
    }

    /// Number of keys currently holding a counter.
    pub fn tracked_keys(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: Uuid) -> Result<RateDecision, CoreError> {
        Ok(self.check_at(key, Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn policy(quota: u32, secs: u64) -> RateLimitPolicy {
        RateLimitPolicy {
            quota,
            window: Duration::from_secs(secs),
        }
    }

    #[test]
    fn quota_requests_pass_then_limited_then_reset() {
        let limiter = InMemoryRateLimiter::new(policy(3, 60));
        let user = Uuid::new_v4();
        let t0 = Instant::now();

        for i in 0..3 {
            let decision = limiter.check_at(user, t0 + Duration::from_secs(i));
            assert!(decision.is_allowed(), "request {i} should pass");
        }

        let limited = limiter.check_at(user, t0 + Duration::from_secs(10));
        assert_eq!(
            limited,
            RateDecision::Limited {
                retry_after: Duration::from_secs(50)
            }
        );

        let after_window = limiter.check_at(user, t0 + Duration::from_secs(61));
        assert_eq!(after_window, RateDecision::Allowed { remaining: 2 });
    }

    #[test]
    fn remaining_counts_down() {
        let limiter = InMemoryRateLimiter::new(policy(2, 60));
        let user = Uuid::new_v4();
        let now = Instant::now();
        assert_eq!(limiter.check_at(user, now), RateDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at(user, now), RateDecision::Allowed { remaining: 0 });
        assert!(!limiter.check_at(user, now).is_allowed());
    }

    #[test]
    fn keys_are_independent() {
        let limiter = InMemoryRateLimiter::new(policy(1, 60));
        let now = Instant::now();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(limiter.check_at(a, now).is_allowed());
        assert!(!limiter.check_at(a, now).is_allowed());
        assert!(limiter.check_at(b, now).is_allowed());
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn limited_decision_maps_to_core_error() {
        let decision = RateDecision::Limited {
            retry_after: Duration::from_millis(1_500),
        };
        assert_matches!(
            decision.into_result(),
            Err(CoreError::RateLimited { retry_after_secs: 2 })
        );
    }

    #[test]
    fn decide_is_inclusive_of_quota() {
        let p = policy(5, 60);
        assert!(decide(5, &p, Duration::ZERO).is_allowed());
        assert!(!decide(6, &p, Duration::ZERO).is_allowed());
    }

    #[test]
    fn window_resets_exactly_at_boundary() {
        let p = policy(1, 10);
        let t0 = Instant::now();
        let mut window = FixedWindow::open(t0);
        assert!(window.hit(&p, t0).is_allowed());
        assert!(!window.hit(&p, t0 + Duration::from_secs(9)).is_allowed());
        assert!(window.hit(&p, t0 + Duration::from_secs(10)).is_allowed());
        assert_eq!(window.count(), 1);
    }

    #[tokio::test]
    async fn trait_check_uses_wall_clock() {
        let limiter = InMemoryRateLimiter::new(policy(1, 60));
        let user = Uuid::new_v4();
        assert!(limiter.check(user).await.unwrap().is_allowed());
        assert!(!limiter.check(user).await.unwrap().is_allowed());
    }
}
