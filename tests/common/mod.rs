//! Shared test fixtures for the gift price SDK integration tests.
//!
//! Provides `ScriptedProvider`, an in-memory [`FloorProvider`] that replays a
//! fixed sequence of outcomes and counts how often it was called, plus a
//! helper that wires providers into a [`FloorResolver`].

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use giftprice_sdk::providers::ProviderResult;
use giftprice_sdk::{FloorProvider, FloorQuote, FloorResolver, ProviderError, RetryPolicy, TtlCache};

/// Provider that returns scripted outcomes in order, then repeats `fallback`.
pub struct ScriptedProvider {
    name: String,
    script: Mutex<VecDeque<ProviderResult>>,
    fallback: ProviderResult,
    calls: AtomicUsize,
    collections: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(name: &str, fallback: ProviderResult) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            collections: Mutex::new(Vec::new()),
        }
    }

    pub fn found(name: &str, price: f64) -> Self {
        Self::new(name, Ok(Some(price)))
    }

    pub fn not_found(name: &str) -> Self {
        Self::new(name, Ok(None))
    }

    pub fn blocked(name: &str) -> Self {
        Self::new(name, Err(ProviderError::Blocked { status: 403 }))
    }

    pub fn failing(name: &str) -> Self {
        Self::new(name, Err(ProviderError::Transport("connection reset".to_string())))
    }

    /// Queue one outcome ahead of the fallback.
    pub fn then(self, outcome: ProviderResult) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn collections(&self) -> Vec<String> {
        self.collections.lock().unwrap().clone()
    }
}

#[async_trait]
impl FloorProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve_floor(&self, collection: &str) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.collections.lock().unwrap().push(collection.to_string());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Retry policy used by resolver tests: 3 attempts with real backoff
/// numbers (tests run with paused time, so nothing actually waits).
pub fn test_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(300),
        factor: 2.0,
        jitter: Duration::from_millis(100),
    }
}

/// Build a resolver over `providers` with a fresh default-TTL cache.
pub fn resolver(providers: Vec<Arc<dyn FloorProvider>>) -> FloorResolver {
    FloorResolver::new(providers, Arc::new(TtlCache::<FloorQuote>::new()), test_policy())
}
