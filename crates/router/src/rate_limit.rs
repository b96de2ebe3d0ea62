//! Fixed-window request limiting keyed by client identity.
//!
//! This is deliberately a fixed-window counter, not a sliding window or
//! token bucket: the count resets when the configured interval has elapsed
//! since the window started, so bursts aligned at a window boundary can
//! admit up to twice the limit across the boundary. That imprecision is the
//! documented behavior, not a bug.

use crate::session::CounterStore;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

/// Per-client counter record persisted in the session store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitCounter {
    pub count: u64,
    pub window_start: u64,
}

/// The limiter's verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateDecision {
    Allow,
    /// The caller emits HTTP 429 with `body` and stops further processing.
    Reject { body: String },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Limits the number of requests per client within a fixed time interval.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u64,
    /// Window length in seconds.
    interval: u64,
    message: String,
}

impl RateLimiter {
    pub fn new(limit: u64, interval: u64) -> Self {
        Self { limit, interval, message: "too many requests".to_string() }
    }

    /// Override the message carried in the rejection body.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Count the current request for `client_id` and decide whether it is
    /// admitted.
    pub fn check(&self, store: &dyn CounterStore, client_id: &str) -> RateDecision {
        self.check_at(store, client_id, now_unix())
    }

    /// Same as [`check`](Self::check) with an explicit timestamp (seconds).
    pub fn check_at(&self, store: &dyn CounterStore, client_id: &str, now: u64) -> RateDecision {
        let key = format!("rate_limit:{client_id}");
        let mut counter = store.get(&key).unwrap_or_default();

        if now.saturating_sub(counter.window_start) >= self.interval {
            counter = RateLimitCounter { count: 1, window_start: now };
        } else {
            counter.count += 1;
        }
        store.set(&key, counter);

        if counter.count > self.limit {
            warn!(
                client = client_id,
                count = counter.count,
                limit = self.limit,
                "rate limit exceeded"
            );
            RateDecision::Reject { body: json!({ "error": self.message }).to_string() }
        } else {
            RateDecision::Allow
        }
    }
}

fn now_unix() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn admits_up_to_the_limit_and_rejects_the_next() {
        let store = MemoryStore::new();
        let limiter = RateLimiter::new(5, 60);

        let mut decisions = Vec::new();
        for second in 0..6 {
            decisions.push(limiter.check_at(&store, "10.0.0.1", second));
        }

        let rejected = decisions.iter().filter(|d| !d.is_allowed()).count();
        assert_eq!(rejected, 1);
        assert!(decisions[..5].iter().all(RateDecision::is_allowed));
        assert!(!decisions[5].is_allowed());
    }

    #[test]
    fn window_resets_after_the_interval() {
        let store = MemoryStore::new();
        let limiter = RateLimiter::new(5, 60);

        for second in 0..6 {
            let _ = limiter.check_at(&store, "10.0.0.1", second);
        }
        assert!(limiter.check_at(&store, "10.0.0.1", 62).is_allowed());
        assert_eq!(
            store.get("rate_limit:10.0.0.1"),
            Some(RateLimitCounter { count: 1, window_start: 62 })
        );
    }

    #[test]
    fn clients_are_counted_independently() {
        let store = MemoryStore::new();
        let limiter = RateLimiter::new(1, 60);

        assert!(limiter.check_at(&store, "10.0.0.1", 0).is_allowed());
        assert!(limiter.check_at(&store, "10.0.0.2", 1).is_allowed());
        assert!(!limiter.check_at(&store, "10.0.0.1", 2).is_allowed());
    }

    #[test]
    fn rejection_body_carries_the_message() {
        let store = MemoryStore::new();
        let limiter = RateLimiter::new(0, 60).with_message("slow down");

        match limiter.check_at(&store, "10.0.0.1", 0) {
            RateDecision::Reject { body } => {
                assert_eq!(body, r#"{"error":"slow down"}"#);
            }
            RateDecision::Allow => panic!("expected Reject"),
        }
    }

    #[test]
    fn boundary_burst_admits_up_to_twice_the_limit() {
        let store = MemoryStore::new();
        let limiter = RateLimiter::new(3, 60);

        // Three requests late in one window, three early in the next: all
        // six are admitted. Fixed-window behavior, kept on purpose.
        for second in [57, 58, 59] {
            assert!(limiter.check_at(&store, "10.0.0.1", second).is_allowed());
        }
        for second in [117, 118, 119] {
            assert!(limiter.check_at(&store, "10.0.0.1", second).is_allowed());
        }
    }
}
