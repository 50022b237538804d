//! # Campus Hex
//!
//! Application service layer and HTTP adapter for the campus CMS service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates domain operations)
//! - `limiter/` - Fixed-window rate limiter shared by all routes
//! - `token/` - Admin token issuing and verification
//! - `license/` - Cached upstream license status
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: ContentRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod license;
pub mod limiter;
pub mod openapi;
pub mod service;
pub mod token;

#[cfg(test)]
mod service_tests;

pub use license::{HttpLicenseProvider, LicenseMonitor};
pub use limiter::{InMemoryRateLimitStore, RateLimiter};
pub use service::CmsService;
pub use token::{IssuedToken, TokenIssuer};
