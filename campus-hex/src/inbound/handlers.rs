//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};

use campus_types::{
    ActivityQuery, AdminIdentity, AppError, BootstrapRequest, ContentRepository,
    CreateAdminRequest, CreatePostRequest, LoginRequest, NavItemId, NavItemRequest, PathQuery,
    PostId, PostQuery, SetFeatureFlagRequest, UpdatePostRequest, UpsertPageRequest,
    UpsertSeoRequest, UpsertSettingRequest,
};

use super::response::{ApiError, ApiResponse, AppJson, AppPath, AppQuery};
use crate::CmsService;
use crate::license::LicenseMonitor;

/// Application state shared across handlers.
pub struct AppState<R: ContentRepository> {
    pub service: CmsService<R>,
    pub license: Arc<LicenseMonitor>,
}

fn parse_post_id(id: &str) -> Result<PostId, AppError> {
    id.parse()
        .map_err(|_| AppError::Validation("Invalid post ID".into()))
}

fn parse_nav_id(id: &str) -> Result<NavItemId, AppError> {
    id.parse()
        .map_err(|_| AppError::Validation("Invalid navigation item ID".into()))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state, req))]
pub async fn login<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.service.login(req).await?;
    Ok(ApiResponse::data(session))
}

/// Creates the first super admin. Only works on an empty installation.
#[tracing::instrument(skip(state, req))]
pub async fn bootstrap<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppJson(req): AppJson<BootstrapRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.service.bootstrap(req).await?;
    Ok(ApiResponse::created(profile))
}

pub async fn me(Extension(actor): Extension<AdminIdentity>) -> impl IntoResponse {
    ApiResponse::data(actor)
}

#[tracing::instrument(skip(state, req), fields(actor = %actor.user_id))]
pub async fn create_admin<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppJson(req): AppJson<CreateAdminRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.service.create_admin(&actor, req).await?;
    Ok(ApiResponse::created(profile))
}

#[tracing::instrument(skip(state))]
pub async fn list_admins<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.list_admins().await?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Public content
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state))]
pub async fn list_published_posts<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppQuery(query): AppQuery<PostQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = state.service.list_published_posts(query).await?;
    Ok(ApiResponse::data(posts))
}

#[tracing::instrument(skip(state))]
pub async fn get_published_post<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppPath(slug): AppPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.get_published_post(&slug).await?))
}

#[tracing::instrument(skip(state))]
pub async fn get_page<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppPath(slug): AppPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.get_page(&slug).await?))
}

pub async fn public_navigation<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.public_navigation().await?))
}

pub async fn list_settings<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.list_settings().await?))
}

pub async fn list_flags<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.list_flags().await?))
}

#[tracing::instrument(skip(state), fields(path = %query.path))]
pub async fn get_seo<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppQuery(query): AppQuery<PathQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.get_seo(&query.path).await?))
}

/// Last known license status, for the front-end banner/overlay.
pub async fn license_status<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> impl IntoResponse {
    ApiResponse::data(state.license.current().await)
}

// ─────────────────────────────────────────────────────────────────────────────
// Admin: posts
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state))]
pub async fn list_posts<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppQuery(query): AppQuery<PostQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.list_posts(query).await?))
}

#[tracing::instrument(skip(state), fields(post_id = %id))]
pub async fn get_post<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppPath(id): AppPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&id)?;
    Ok(ApiResponse::data(state.service.get_post(id).await?))
}

#[tracing::instrument(skip(state, req), fields(actor = %actor.user_id, slug = %req.slug))]
pub async fn create_post<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppJson(req): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.service.create_post(&actor, req).await?;
    Ok(ApiResponse::created(post))
}

#[tracing::instrument(skip(state, req), fields(actor = %actor.user_id, post_id = %id))]
pub async fn update_post<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&id)?;
    Ok(ApiResponse::data(state.service.update_post(&actor, id, req).await?))
}

#[tracing::instrument(skip(state), fields(actor = %actor.user_id, post_id = %id))]
pub async fn delete_post<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(id): AppPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&id)?;
    state.service.delete_post(&actor, id).await?;
    Ok(ApiResponse::message("Post deleted"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Admin: pages & navigation
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_pages<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.list_pages().await?))
}

#[tracing::instrument(skip(state, req), fields(actor = %actor.user_id))]
pub async fn upsert_page<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(slug): AppPath<String>,
    AppJson(req): AppJson<UpsertPageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.upsert_page(&actor, &slug, req).await?))
}

#[tracing::instrument(skip(state), fields(actor = %actor.user_id))]
pub async fn delete_page<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(slug): AppPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete_page(&actor, &slug).await?;
    Ok(ApiResponse::message("Page deleted"))
}

pub async fn list_navigation<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.list_navigation().await?))
}

#[tracing::instrument(skip(state, req), fields(actor = %actor.user_id))]
pub async fn create_nav_item<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppJson(req): AppJson<NavItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.service.create_nav_item(&actor, req).await?;
    Ok(ApiResponse::created(item))
}

#[tracing::instrument(skip(state, req), fields(actor = %actor.user_id, nav_id = %id))]
pub async fn update_nav_item<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<NavItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_nav_id(&id)?;
    Ok(ApiResponse::data(state.service.update_nav_item(&actor, id, req).await?))
}

#[tracing::instrument(skip(state), fields(actor = %actor.user_id, nav_id = %id))]
pub async fn delete_nav_item<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(id): AppPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_nav_id(&id)?;
    state.service.delete_nav_item(&actor, id).await?;
    Ok(ApiResponse::message("Navigation item deleted"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Admin: settings, feature flags, SEO
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state, req), fields(actor = %actor.user_id))]
pub async fn upsert_setting<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(key): AppPath<String>,
    AppJson(req): AppJson<UpsertSettingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.upsert_setting(&actor, &key, req).await?))
}

#[tracing::instrument(skip(state), fields(actor = %actor.user_id))]
pub async fn delete_setting<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(key): AppPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete_setting(&actor, &key).await?;
    Ok(ApiResponse::message("Setting deleted"))
}

#[tracing::instrument(skip(state), fields(actor = %actor.user_id, enabled = req.enabled))]
pub async fn set_flag<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(key): AppPath<String>,
    AppJson(req): AppJson<SetFeatureFlagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.set_flag(&actor, &key, req).await?))
}

#[tracing::instrument(skip(state), fields(actor = %actor.user_id))]
pub async fn delete_flag<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppPath(key): AppPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete_flag(&actor, &key).await?;
    Ok(ApiResponse::message("Feature flag deleted"))
}

pub async fn list_seo<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.list_seo().await?))
}

#[tracing::instrument(skip(state, req), fields(actor = %actor.user_id, path = %req.path))]
pub async fn upsert_seo<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppJson(req): AppJson<UpsertSeoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.upsert_seo(&actor, req).await?))
}

#[tracing::instrument(skip(state), fields(actor = %actor.user_id, path = %query.path))]
pub async fn delete_seo<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(actor): Extension<AdminIdentity>,
    AppQuery(query): AppQuery<PathQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete_seo(&actor, &query.path).await?;
    Ok(ApiResponse::message("SEO metadata deleted"))
}

#[tracing::instrument(skip(state))]
pub async fn list_activity<R: ContentRepository>(
    State(state): State<Arc<AppState<R>>>,
    AppQuery(query): AppQuery<ActivityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::data(state.service.list_activity(query).await?))
}
