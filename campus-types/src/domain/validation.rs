//! Shared field validators.

use crate::error::DomainError;

/// URL slugs: lowercase ASCII alphanumerics separated by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let well_formed = !slug.is_empty()
        && slug.len() <= 128
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(DomainError::ValidationError(format!(
            "Invalid slug '{}': use lowercase letters, digits and single hyphens",
            slug
        )))
    }
}

/// Setting and feature-flag keys.
pub fn validate_key(key: &str) -> Result<(), DomainError> {
    let well_formed = !key.is_empty()
        && key.len() <= 64
        && key.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.')
        });
    if well_formed {
        Ok(())
    } else {
        Err(DomainError::ValidationError(format!("Invalid key '{}'", key)))
    }
}

/// Site paths used for SEO metadata, e.g. `/admissions`.
pub fn validate_path(path: &str) -> Result<(), DomainError> {
    if path.starts_with('/') && path.len() <= 256 && !path.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        Err(DomainError::ValidationError(format!(
            "Invalid path '{}': must start with '/' and contain no spaces",
            path
        )))
    }
}

/// Non-blank text with an upper length bound.
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }
    if value.chars().count() > max_len {
        return Err(DomainError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs() {
        assert!(validate_slug("open-day-2026").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Open-Day").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug("with space").is_err());
    }

    #[test]
    fn test_keys() {
        assert!(validate_key("site.name").is_ok());
        assert!(validate_key("enable_gallery").is_ok());
        assert!(validate_key("Site").is_err());
        assert!(validate_key(&"k".repeat(65)).is_err());
    }

    #[test]
    fn test_paths() {
        assert!(validate_path("/").is_ok());
        assert!(validate_path("/campus-life/sports").is_ok());
        assert!(validate_path("about").is_err());
        assert!(validate_path("/a b").is_err());
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("Title", "Welcome", 10).is_ok());
        assert!(require_text("Title", "   ", 10).is_err());
        assert!(require_text("Title", "too long title", 5).is_err());
    }
}
