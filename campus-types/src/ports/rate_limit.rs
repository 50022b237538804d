//! Rate-limit counter store port.
//!
//! The in-process adapter keeps records in memory; a shared key-value store
//! with atomic increment/expire can implement the same contract for
//! multi-instance deployments.

use crate::domain::{RateLimitConfig, RateLimitDecision};

/// Storage for fixed-window request counters keyed by client identifier.
///
/// Operations are synchronous and infallible: a store that cannot answer
/// must treat the key as not yet limited.
pub trait RateLimitStore: Send + Sync + 'static {
    /// Counts a request for `key` at `now_ms` and reports whether it is allowed.
    fn hit(&self, key: &str, now_ms: i64, config: &RateLimitConfig) -> RateLimitDecision;

    /// Removes records whose window has passed. Returns how many were removed.
    fn sweep(&self, now_ms: i64) -> usize;

    /// Number of live records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
