//! Domain models for the campus CMS service.

/// Declares a UUID-backed identifier newtype.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }
    };
}

pub mod activity;
pub mod admin;
pub mod content;
pub mod license;
pub mod rate_limit;
pub mod validation;

pub use activity::{ActivityEntry, ActivityId};
pub use admin::{AdminIdentity, AdminRole, AdminUser, AdminUserId};
pub use content::{
    BlogPost, FeatureFlag, NavItemId, NavigationItem, Page, PostId, PostStatus, SeoMetadata,
    SiteSetting,
};
pub use license::{LicenseNotice, LicenseStatus};
pub use rate_limit::{MAX_WINDOW_MS, RateLimitConfig, RateLimitDecision, RateLimitRecord};
