//! # Campus Types
//!
//! Domain types and port traits for the school website CMS service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (admins, content, rate-limit windows, license)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ActivityEntry, ActivityId, AdminIdentity, AdminRole, AdminUser, AdminUserId, BlogPost,
    FeatureFlag, LicenseNotice, LicenseStatus, NavItemId, NavigationItem, Page, PostId,
    PostStatus, RateLimitConfig, RateLimitDecision, RateLimitRecord, SeoMetadata, SiteSetting,
};
pub use dto::*;
pub use error::{AppError, AuthError, DomainError, LicenseError, RepoError};
pub use ports::{
    Clock, ContentRepository, LicenseProvider, ManualClock, RateLimitStore, SystemClock,
};
