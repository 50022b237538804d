//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod clock;
mod license;
mod rate_limit;
mod repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use license::LicenseProvider;
pub use rate_limit::RateLimitStore;
pub use repository::ContentRepository;
