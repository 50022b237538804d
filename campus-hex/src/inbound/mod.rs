//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

pub mod auth;
pub mod client_id;
mod handlers;
pub mod rate_limit;
mod response;
mod server;

pub use client_id::{Environment, identify};
pub use response::{ApiError, ApiResponse, AppJson, AppPath, AppQuery, ErrorBody};
pub use server::{HttpServer, RateLimitSettings};
