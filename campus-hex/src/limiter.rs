//! Fixed-window request limiter.
//!
//! One `RateLimiter` is built at process start and shared by reference with
//! every route that needs throttling.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;

use campus_types::{
    Clock, RateLimitConfig, RateLimitDecision, RateLimitRecord, RateLimitStore, SystemClock,
};

/// Process-local counter store.
///
/// Records live only in this process, so each instance of a multi-instance
/// deployment enforces its own quota. Check-and-increment for one key runs
/// under that key's shard lock.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    records: DashMap<String, RateLimitRecord>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record for `key`, if any.
    pub fn get(&self, key: &str) -> Option<RateLimitRecord> {
        self.records.get(key).map(|r| *r)
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn hit(&self, key: &str, now_ms: i64, config: &RateLimitConfig) -> RateLimitDecision {
        match self.records.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().register(now_ms, config),
            Entry::Vacant(vacant) => {
                let (record, decision) = RateLimitRecord::open(now_ms, config);
                vacant.insert(record);
                decision
            }
        }
    }

    fn sweep(&self, now_ms: i64) -> usize {
        let mut removed = 0;
        self.records.retain(|_, record| {
            let keep = !record.is_expired(now_ms);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Rate limiter service: a counter store plus the clock that drives it.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryRateLimitStore::new()), Arc::new(SystemClock))
    }
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Counts a request for `key` and reports whether it may proceed.
    pub fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitDecision {
        self.store.hit(key, self.clock.now_millis(), config)
    }

    /// Drops expired records. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        self.store.sweep(self.clock.now_millis())
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Number of tracked keys.
    pub fn tracked_keys(&self) -> usize {
        self.store.len()
    }

    /// Spawns the periodic cleanup task. It runs until the runtime shuts down
    /// or the handle is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = self.cleanup();
                if removed > 0 {
                    tracing::debug!(
                        removed,
                        remaining = self.tracked_keys(),
                        "Swept rate-limit records"
                    );
                }
            }
        })
    }
}
