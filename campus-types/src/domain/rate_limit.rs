//! Fixed-window rate limiting rules.
//!
//! Timestamps are milliseconds since the Unix epoch so that records can be
//! moved into an external key-value store without conversion.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Longest accepted window (30 days).
pub const MAX_WINDOW_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Window length and request quota for one rate-limit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl RateLimitConfig {
    /// Creates a policy.
    ///
    /// # Validation
    /// - `window_ms` must be positive and at most [`MAX_WINDOW_MS`]
    /// - `max_requests` must be positive
    pub fn new(window_ms: u64, max_requests: u32) -> Result<Self, DomainError> {
        if window_ms == 0 {
            return Err(DomainError::ValidationError(
                "Rate limit window must be positive".into(),
            ));
        }
        if window_ms > MAX_WINDOW_MS {
            return Err(DomainError::ValidationError(format!(
                "Rate limit window must be at most {} ms",
                MAX_WINDOW_MS
            )));
        }
        if max_requests == 0 {
            return Err(DomainError::ValidationError(
                "Rate limit quota must be positive".into(),
            ));
        }
        Ok(Self {
            window_ms,
            max_requests,
        })
    }
}

/// Counter state for one client key inside the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitRecord {
    pub count: u32,
    pub reset_time: i64,
}

/// Outcome of a single rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_time: i64,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, rounded up and never below one.
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let wait_ms = (self.reset_time - now_ms).max(0) as u64;
        wait_ms.div_ceil(1000).max(1)
    }

    /// Reset time as Unix seconds, rounded up.
    pub fn reset_epoch_secs(&self) -> i64 {
        self.reset_time.saturating_add(999).div_euclid(1000)
    }
}

impl RateLimitRecord {
    /// Opens a fresh window with this request counted.
    pub fn open(now_ms: i64, config: &RateLimitConfig) -> (Self, RateLimitDecision) {
        let window = i64::try_from(config.window_ms).unwrap_or(i64::MAX);
        let record = Self {
            count: 1,
            reset_time: now_ms.saturating_add(window),
        };
        let decision = RateLimitDecision {
            allowed: true,
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(1),
            reset_time: record.reset_time,
        };
        (record, decision)
    }

    /// Whether the window has passed.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.reset_time
    }

    /// Counts one more request against this record.
    ///
    /// An expired record is replaced by a fresh window. A record at its quota
    /// is left untouched and the request is denied.
    pub fn register(&mut self, now_ms: i64, config: &RateLimitConfig) -> RateLimitDecision {
        if self.is_expired(now_ms) {
            let (fresh, decision) = Self::open(now_ms, config);
            *self = fresh;
            return decision;
        }

        if self.count >= config.max_requests {
            return RateLimitDecision {
                allowed: false,
                limit: config.max_requests,
                remaining: 0,
                reset_time: self.reset_time,
            };
        }

        self.count += 1;
        RateLimitDecision {
            allowed: true,
            limit: config.max_requests,
            remaining: config.max_requests - self.count,
            reset_time: self.reset_time,
        }
    }
}
