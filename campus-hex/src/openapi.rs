//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use campus_types::domain::{
    ActivityEntry, ActivityId, AdminIdentity, AdminRole, AdminUserId, BlogPost, FeatureFlag,
    LicenseNotice, LicenseStatus, NavItemId, NavigationItem, Page, PostId, PostStatus,
    SeoMetadata, SiteSetting,
};
use campus_types::dto::{
    AdminProfile, BootstrapRequest, CreateAdminRequest, CreatePostRequest, LicenseStatusResponse,
    LoginRequest, LoginResponse, NavItemRequest, SetFeatureFlagRequest, UpdatePostRequest,
    UpsertPageRequest, UpsertSeoRequest, UpsertSettingRequest,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

use crate::inbound::ErrorBody;

// Dummy functions to generate path documentation.
// Successful bodies are wrapped in `{"success": true, "data": ...}`.

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Exchange admin credentials for a token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 429, description = "Too many login attempts", body = ErrorBody)
    )
)]
async fn login() {}

/// Create the first super admin
#[utoipa::path(
    post,
    path = "/api/auth/bootstrap",
    tag = "auth",
    request_body = BootstrapRequest,
    responses(
        (status = 201, description = "Super admin created", body = AdminProfile),
        (status = 409, description = "An admin account already exists", body = ErrorBody)
    )
)]
async fn bootstrap() {}

/// Identity of the calling admin
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller identity", body = AdminIdentity),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
async fn me() {}

/// List admin accounts
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admins",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin accounts", body = Vec<AdminProfile>),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
async fn list_admins() {}

/// Create an admin account (super admins only)
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "admins",
    request_body = CreateAdminRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Admin created", body = AdminProfile),
        (status = 403, description = "Caller is not a super admin", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
async fn create_admin() {}

/// List published posts
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "public",
    params(campus_types::dto::PostQuery),
    responses(
        (status = 200, description = "Published posts, newest first", body = Vec<BlogPost>),
        (status = 400, description = "Invalid paging", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody)
    )
)]
async fn list_published_posts() {}

/// Get a published post by slug
#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    tag = "public",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post", body = BlogPost),
        (status = 404, description = "No published post with this slug", body = ErrorBody)
    )
)]
async fn get_published_post() {}

/// Get a page by slug
#[utoipa::path(
    get,
    path = "/api/pages/{slug}",
    tag = "public",
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Page", body = Page),
        (status = 404, description = "Page not found", body = ErrorBody)
    )
)]
async fn get_page() {}

/// Visible navigation items
#[utoipa::path(
    get,
    path = "/api/navigation",
    tag = "public",
    responses((status = 200, description = "Navigation items ordered by position", body = Vec<NavigationItem>))
)]
async fn public_navigation() {}

/// Site settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "public",
    responses((status = 200, description = "All site settings", body = Vec<SiteSetting>))
)]
async fn list_settings() {}

/// Feature flags
#[utoipa::path(
    get,
    path = "/api/features",
    tag = "public",
    responses((status = 200, description = "All feature flags", body = Vec<FeatureFlag>))
)]
async fn list_flags() {}

/// SEO metadata for a path
#[utoipa::path(
    get,
    path = "/api/seo",
    tag = "public",
    params(campus_types::dto::PathQuery),
    responses(
        (status = 200, description = "SEO metadata", body = SeoMetadata),
        (status = 404, description = "No metadata for this path", body = ErrorBody)
    )
)]
async fn get_seo() {}

/// Last known license status
#[utoipa::path(
    get,
    path = "/api/license/status",
    tag = "public",
    responses((status = 200, description = "Status and derived notice", body = LicenseStatusResponse))
)]
async fn license_status() {}

/// List all posts
#[utoipa::path(
    get,
    path = "/api/admin/posts",
    tag = "posts",
    params(campus_types::dto::PostQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Posts", body = Vec<BlogPost>),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
async fn list_posts() {}

/// Create a post
#[utoipa::path(
    post,
    path = "/api/admin/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Post created", body = BlogPost),
        (status = 400, description = "Invalid post", body = ErrorBody),
        (status = 409, description = "Slug already used", body = ErrorBody)
    )
)]
async fn create_post() {}

/// Get a post by ID
#[utoipa::path(
    get,
    path = "/api/admin/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = PostId, Path, description = "Post ID (UUID)")),
    responses(
        (status = 200, description = "Post", body = BlogPost),
        (status = 404, description = "Post not found", body = ErrorBody)
    )
)]
async fn get_post() {}

/// Update a post
#[utoipa::path(
    put,
    path = "/api/admin/posts/{id}",
    tag = "posts",
    request_body = UpdatePostRequest,
    security(("bearer_auth" = [])),
    params(("id" = PostId, Path, description = "Post ID (UUID)")),
    responses(
        (status = 200, description = "Post updated", body = BlogPost),
        (status = 404, description = "Post not found", body = ErrorBody),
        (status = 409, description = "Slug already used", body = ErrorBody)
    )
)]
async fn update_post() {}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/api/admin/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = PostId, Path, description = "Post ID (UUID)")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ErrorBody)
    )
)]
async fn delete_post() {}

/// List pages
#[utoipa::path(
    get,
    path = "/api/admin/pages",
    tag = "pages",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Pages", body = Vec<Page>))
)]
async fn list_pages() {}

/// Create or replace a page
#[utoipa::path(
    put,
    path = "/api/admin/pages/{slug}",
    tag = "pages",
    request_body = UpsertPageRequest,
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Page saved", body = Page),
        (status = 400, description = "Invalid page", body = ErrorBody)
    )
)]
async fn upsert_page() {}

/// Delete a page
#[utoipa::path(
    delete,
    path = "/api/admin/pages/{slug}",
    tag = "pages",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Page deleted"),
        (status = 404, description = "Page not found", body = ErrorBody)
    )
)]
async fn delete_page() {}

/// List all navigation items
#[utoipa::path(
    get,
    path = "/api/admin/navigation",
    tag = "navigation",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Navigation items", body = Vec<NavigationItem>))
)]
async fn list_navigation() {}

/// Create a navigation item
#[utoipa::path(
    post,
    path = "/api/admin/navigation",
    tag = "navigation",
    request_body = NavItemRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Item created", body = NavigationItem),
        (status = 400, description = "Invalid item or unknown parent", body = ErrorBody)
    )
)]
async fn create_nav_item() {}

/// Replace a navigation item
#[utoipa::path(
    put,
    path = "/api/admin/navigation/{id}",
    tag = "navigation",
    request_body = NavItemRequest,
    security(("bearer_auth" = [])),
    params(("id" = NavItemId, Path, description = "Navigation item ID (UUID)")),
    responses(
        (status = 200, description = "Item updated", body = NavigationItem),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
async fn update_nav_item() {}

/// Delete a navigation item
#[utoipa::path(
    delete,
    path = "/api/admin/navigation/{id}",
    tag = "navigation",
    security(("bearer_auth" = [])),
    params(("id" = NavItemId, Path, description = "Navigation item ID (UUID)")),
    responses(
        (status = 200, description = "Item deleted; children become top-level"),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
async fn delete_nav_item() {}

/// Set a site setting
#[utoipa::path(
    put,
    path = "/api/admin/settings/{key}",
    tag = "settings",
    request_body = UpsertSettingRequest,
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Setting saved", body = SiteSetting),
        (status = 400, description = "Invalid key", body = ErrorBody)
    )
)]
async fn upsert_setting() {}

/// Delete a site setting
#[utoipa::path(
    delete,
    path = "/api/admin/settings/{key}",
    tag = "settings",
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Setting deleted"),
        (status = 404, description = "Setting not found", body = ErrorBody)
    )
)]
async fn delete_setting() {}

/// Turn a feature flag on or off
#[utoipa::path(
    put,
    path = "/api/admin/features/{key}",
    tag = "settings",
    request_body = SetFeatureFlagRequest,
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "Flag key")),
    responses(
        (status = 200, description = "Flag saved", body = FeatureFlag),
        (status = 400, description = "Invalid key", body = ErrorBody)
    )
)]
async fn set_flag() {}

/// Delete a feature flag
#[utoipa::path(
    delete,
    path = "/api/admin/features/{key}",
    tag = "settings",
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "Flag key")),
    responses(
        (status = 200, description = "Flag deleted"),
        (status = 404, description = "Flag not found", body = ErrorBody)
    )
)]
async fn delete_flag() {}

/// List SEO metadata
#[utoipa::path(
    get,
    path = "/api/admin/seo",
    tag = "seo",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "SEO metadata for all paths", body = Vec<SeoMetadata>))
)]
async fn list_seo() {}

/// Create or replace SEO metadata
#[utoipa::path(
    put,
    path = "/api/admin/seo",
    tag = "seo",
    request_body = UpsertSeoRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Metadata saved", body = SeoMetadata),
        (status = 400, description = "Invalid path or title", body = ErrorBody)
    )
)]
async fn upsert_seo() {}

/// Delete SEO metadata
#[utoipa::path(
    delete,
    path = "/api/admin/seo",
    tag = "seo",
    params(campus_types::dto::PathQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Metadata deleted"),
        (status = 404, description = "No metadata for this path", body = ErrorBody)
    )
)]
async fn delete_seo() {}

/// Recent admin activity
#[utoipa::path(
    get,
    path = "/api/admin/activity",
    tag = "admins",
    params(campus_types::dto::ActivityQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Activity entries, newest first", body = Vec<ActivityEntry>))
)]
async fn list_activity() {}

/// OpenAPI documentation for the campus CMS API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus CMS API",
        version = "1.0.0",
        description = "Content API for a school website: blog posts, pages, navigation, settings, feature flags and SEO metadata.\n\n## Authentication\n\nAdmin endpoints require a Bearer token. Create the first account with `/api/auth/bootstrap`, then obtain a token from `/api/auth/login`:\n\n```\nAuthorization: Bearer <token>\n```\n\n## Rate limits\n\nResponses carry `X-RateLimit-Limit`, `X-RateLimit-Remaining` and `X-RateLimit-Reset`. Rejected requests get `429` with `Retry-After`.",
        license(name = "MIT"),
    ),
    paths(
        health,
        login,
        bootstrap,
        me,
        list_admins,
        create_admin,
        list_published_posts,
        get_published_post,
        get_page,
        public_navigation,
        list_settings,
        list_flags,
        get_seo,
        license_status,
        list_posts,
        create_post,
        get_post,
        update_post,
        delete_post,
        list_pages,
        upsert_page,
        delete_page,
        list_navigation,
        create_nav_item,
        update_nav_item,
        delete_nav_item,
        upsert_setting,
        delete_setting,
        set_flag,
        delete_flag,
        list_seo,
        upsert_seo,
        delete_seo,
        list_activity,
    ),
    components(
        schemas(
            ActivityEntry,
            ActivityId,
            AdminIdentity,
            AdminProfile,
            AdminRole,
            AdminUserId,
            BlogPost,
            BootstrapRequest,
            CreateAdminRequest,
            CreatePostRequest,
            ErrorBody,
            FeatureFlag,
            LicenseNotice,
            LicenseStatus,
            LicenseStatusResponse,
            LoginRequest,
            LoginResponse,
            NavItemId,
            NavItemRequest,
            NavigationItem,
            Page,
            PostId,
            PostStatus,
            SeoMetadata,
            SetFeatureFlagRequest,
            SiteSetting,
            UpdatePostRequest,
            UpsertPageRequest,
            UpsertSeoRequest,
            UpsertSettingRequest,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, bootstrap and caller identity"),
        (name = "admins", description = "Admin accounts and activity log"),
        (name = "public", description = "Read-only content for the public site"),
        (name = "posts", description = "Blog post management"),
        (name = "pages", description = "Page content management"),
        (name = "navigation", description = "Navigation menu management"),
        (name = "settings", description = "Site settings and feature flags"),
        (name = "seo", description = "Per-path SEO metadata"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer token authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
