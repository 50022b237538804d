//! Admin authentication middleware (bearer tokens).

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use campus_types::{AdminIdentity, AppError, AuthError};

use super::response::ApiError;
use crate::token::TokenIssuer;

/// Extracts the token from the Authorization header.
/// Expected format: "Bearer <token>"
fn extract_bearer(auth_header: Option<&str>) -> Option<&str> {
    auth_header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verifies the request's bearer token and returns the embedded identity.
pub fn require_admin(
    headers: &HeaderMap,
    tokens: &TokenIssuer,
) -> Result<AdminIdentity, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = extract_bearer(auth_header).ok_or(AuthError::MissingToken)?;
    tokens.verify(token)
}

/// Authentication middleware for admin routes.
///
/// On success the caller's [`AdminIdentity`] is stored in the request
/// extensions. Every failure becomes the same 401 body; the reason is
/// only logged.
pub async fn admin_auth_middleware(
    State(tokens): State<Arc<TokenIssuer>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match require_admin(request.headers(), &tokens) {
        Ok(identity) => {
            tracing::debug!(
                user_id = %identity.user_id,
                role = %identity.role,
                "Admin authenticated"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::info!(path = %request.uri().path(), "Admin auth rejected: {}", e);
            ApiError(AppError::Unauthorized).into_response()
        }
    }
}
