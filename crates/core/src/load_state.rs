//! Load-state machine shared by the client stores.
//!
//! A store is `Idle` when its snapshot is current, `Loading` while a request
//! is in flight and `Error` after the last request failed. The snapshot
//! itself is kept across failures so callers can keep showing stale data.

use serde::Serialize;

/// Total attempts (first try included) allowed for one workspace load.
pub const MAX_LOAD_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Error(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Enter `Loading`, clearing any previous error.
    pub fn begin(&mut self) {
        *self = Self::Loading;
    }

    pub fn succeed(&mut self) {
        *self = Self::Idle;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = Self::Error(message.into());
    }

    /// Record the outcome of one request and hand the result back.
    pub fn settle<T, E: ToString>(&mut self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.succeed(),
            Err(e) => self.fail(e.to_string()),
        }
        result
    }
}

/// Fixed attempt counter with no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptCounter {
    attempts: u32,
    max: u32,
}

impl AttemptCounter {
    pub fn new(max: u32) -> Self {
        Self { attempts: 0, max }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn record(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// `true` while another attempt is allowed.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

impl Default for AttemptCounter {
    fn default() -> Self {
        Self::new(MAX_LOAD_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        let mut state = LoadState::default();
        assert_eq!(state, LoadState::Idle);

        state.begin();
        assert!(state.is_loading());

        state.fail("boom");
        assert_eq!(state.error(), Some("boom"));

        state.begin();
        assert_eq!(state.error(), None);
        state.succeed();
        assert_eq!(state, LoadState::Idle);
    }

    #[test]
    fn settle_records_outcome() {
        let mut state = LoadState::Loading;
        let result: Result<u8, String> = state.settle(Err("offline".into()));
        assert!(result.is_err());
        assert_eq!(state, LoadState::Error("offline".into()));

        assert_eq!(state.settle::<_, String>(Ok(1)), Ok(1));
        assert_eq!(state, LoadState::Idle);
    }

    #[test]
    fn counter_allows_three_attempts() {
        let mut counter = AttemptCounter::default();
        for _ in 0..MAX_LOAD_ATTEMPTS {
            assert!(counter.can_retry());
            counter.record();
        }
        assert!(!counter.can_retry());
        counter.reset();
        assert_eq!(counter.attempts(), 0);
        assert!(counter.can_retry());
    }

    #[test]
    fn serializes_with_tag() {
        let json = serde_json::to_value(LoadState::Error("x".into())).unwrap();
        assert_eq!(json, serde_json::json!({"state": "error", "message": "x"}));
        let json = serde_json::to_value(LoadState::Idle).unwrap();
        assert_eq!(json, serde_json::json!({"state": "idle"}));
    }
}
