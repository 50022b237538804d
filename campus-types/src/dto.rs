//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AdminRole, AdminUser, AdminUserId, LicenseNotice, LicenseStatus, NavItemId, PostStatus,
};

/// Default page size for post listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

// ─────────────────────────────────────────────────────────────────────────────
// Auth & Admin DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Credentials for an admin login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "office@school.edu")]
    pub email: String,
    pub password: String,
}

/// Issued admin token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AdminProfile,
}

/// Public view of an admin account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: AdminUserId,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<AdminUser> for AdminProfile {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Creates the first super admin on an empty installation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BootstrapRequest {
    #[schema(example = "principal@school.edu")]
    pub email: String,
    #[schema(example = "Principal")]
    pub name: String,
    pub password: String,
}

/// Creates an additional admin account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAdminRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default = "default_admin_role")]
    pub role: AdminRole,
}

fn default_admin_role() -> AdminRole {
    AdminRole::Editor
}

// ─────────────────────────────────────────────────────────────────────────────
// Blog DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a blog post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[schema(example = "science-fair-winners")]
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub content: String,
    #[schema(example = "achievements")]
    pub category: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_post_status")]
    pub status: PostStatus,
}

fn default_post_status() -> PostStatus {
    PostStatus::Draft
}

/// Partial update of a blog post; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
}

/// Query string for post listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostQuery {
    pub category: Option<String>,
    pub status: Option<PostStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Repository-level filter for post listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub category: Option<String>,
    pub status: Option<PostStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            category: None,
            status: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page, Navigation, Settings, Flags, SEO DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Creates or replaces a page's content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpsertPageRequest {
    pub title: String,
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}

/// Full description of a navigation item (used for create and replace).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavItemRequest {
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub parent_id: Option<NavItemId>,
    #[serde(default)]
    pub position: i64,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

fn default_true() -> bool {
    true
}

/// Sets a site setting value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpsertSettingRequest {
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

/// Turns a feature flag on or off.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetFeatureFlagRequest {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Creates or replaces SEO metadata for a path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSeoRequest {
    #[schema(example = "/admissions")]
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub og_image: Option<String>,
}

/// `?path=` query parameter.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PathQuery {
    pub path: String,
}

/// `?limit=` query parameter for the activity log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// License DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Last known license status and the notice derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LicenseStatusResponse {
    pub status: Option<LicenseStatus>,
    pub notice: LicenseNotice,
    pub checked_at: Option<DateTime<Utc>>,
}
