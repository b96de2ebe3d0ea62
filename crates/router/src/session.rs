//! The session-backed counter store collaborator.
//!
//! The rate limiter is the one piece of the router that mutates shared
//! state during dispatch. It does so only through this contract; keys are
//! namespaced by client identity by the caller. A store that cannot make
//! the read-modify-write atomic degrades the limiter's accuracy but must
//! not deadlock or crash.

use crate::rate_limit::RateLimitCounter;

use std::collections::HashMap;
use std::sync::Mutex;

pub trait CounterStore: Send + Sync {
    fn get(&self, key: &str) -> Option<RateLimitCounter>;
    fn set(&self, key: &str, counter: RateLimitCounter);
}

/// Process-local store backing the rate limiter with a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, RateLimitCounter>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryStore {
    fn get(&self, key: &str) -> Option<RateLimitCounter> {
        self.inner.lock().expect("counter store mutex poisoned").get(key).copied()
    }

    fn set(&self, key: &str, counter: RateLimitCounter) {
        self.inner.lock().expect("counter store mutex poisoned").insert(key.to_string(), counter);
    }
}
