//! Rate limiting middleware.
//!
//! Implements per-client fixed-window limiting. Each policy has a scope name
//! so separate route groups (general API, login) keep separate counters.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use campus_types::{AppError, RateLimitConfig, RateLimitDecision};

use super::client_id::{Environment, identify};
use super::response::ApiError;
use crate::limiter::RateLimiter;

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// A named quota applied to a group of routes.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    pub scope: &'static str,
    pub config: RateLimitConfig,
}

impl RateLimitPolicy {
    pub fn new(scope: &'static str, config: RateLimitConfig) -> Self {
        Self { scope, config }
    }

    fn bucket(&self, client: &str) -> String {
        format!("{}:{}", self.scope, client)
    }
}

/// State for one rate-limit middleware instance.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter>,
    pub policy: RateLimitPolicy,
    pub environment: Environment,
}

fn add_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(HEADER_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(HEADER_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(HEADER_RESET, HeaderValue::from(decision.reset_epoch_secs()));
}

/// Rate limiting middleware.
///
/// `/health` is never limited. Allowed responses carry the
/// `X-RateLimit-*` headers; rejected ones are 429 with `Retry-After`.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let client = identify(request.headers(), state.environment);
    let key = state.policy.bucket(&client);
    let decision = state.limiter.check(&key, &state.policy.config);

    if decision.allowed {
        let mut response = next.run(request).await;
        add_rate_limit_headers(response.headers_mut(), &decision);
        return response;
    }

    let retry_after_secs = decision.retry_after_secs(state.limiter.now_millis());
    tracing::warn!(
        client = %client,
        scope = state.policy.scope,
        retry_after = retry_after_secs,
        "Rate limit exceeded"
    );

    let mut response = ApiError(AppError::RateLimited { retry_after_secs }).into_response();
    add_rate_limit_headers(response.headers_mut(), &decision);
    response
}
