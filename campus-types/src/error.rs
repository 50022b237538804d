//! Error types for the campus CMS service.

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Admin token and credential failures.
///
/// Every variant surfaces to clients as the same 401 body.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Failures fetching the upstream license status.
#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    #[error("License service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed license response: {0}")]
    Malformed(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => AppError::Validation(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Conflict(e) => AppError::Conflict(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(e) => AppError::Internal(e),
            _ => AppError::Unauthorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(RepoError::Conflict("slug taken".into())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::Domain(DomainError::ValidationError("x".into()))),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_auth_failures_collapse_to_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::TokenExpired,
            AuthError::InvalidCredentials,
        ] {
            assert!(matches!(AppError::from(err), AppError::Unauthorized));
        }
    }
}
