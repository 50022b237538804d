//! Database row types and their conversion into domain types.
//!
//! SQLite stores identifiers and timestamps as TEXT (UUID / RFC 3339) and
//! lists or free-form values as JSON TEXT.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use campus_types::{
    ActivityEntry, AdminUser, BlogPost, DomainError, FeatureFlag, NavigationItem, Page,
    RepoError, SeoMetadata, SiteSetting,
};

// ─────────────────────────────────────────────────────────────────────────────
// Column decoding helpers
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Database(format!("Invalid timestamp '{}': {}", value, e)))
}

fn parse_optional_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>, RepoError> {
    value.as_deref().map(parse_timestamp).transpose()
}

fn parse_id<T: std::str::FromStr>(value: &str) -> Result<T, RepoError> {
    value
        .parse()
        .map_err(|_| RepoError::Database(format!("Invalid id: {}", value)))
}

fn parse_json<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, RepoError> {
    serde_json::from_str(value)
        .map_err(|e| RepoError::Database(format!("Invalid JSON column: {}", e)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Admin user row.
#[derive(FromRow)]
pub struct DbAdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl DbAdminUser {
    pub fn into_domain(self) -> Result<AdminUser, RepoError> {
        Ok(AdminUser {
            id: parse_id(&self.id)?,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            role: self.role.parse().map_err(RepoError::Domain)?,
            is_active: self.is_active,
            created_at: parse_timestamp(&self.created_at)?,
            last_login_at: parse_optional_timestamp(self.last_login_at)?,
        })
    }
}

/// Blog post row.
#[derive(FromRow)]
pub struct DbBlogPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub tags: String,
    pub status: String,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl DbBlogPost {
    pub fn into_domain(self) -> Result<BlogPost, RepoError> {
        Ok(BlogPost {
            id: parse_id(&self.id)?,
            slug: self.slug,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            category: self.category,
            author: self.author,
            cover_image: self.cover_image,
            tags: parse_json(&self.tags)?,
            status: self
                .status
                .parse()
                .map_err(|e: String| RepoError::Domain(DomainError::ValidationError(e)))?,
            published_at: parse_optional_timestamp(self.published_at)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Page row.
#[derive(FromRow)]
pub struct DbPage {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub updated_at: String,
}

impl DbPage {
    pub fn into_domain(self) -> Result<Page, RepoError> {
        Ok(Page {
            slug: self.slug,
            title: self.title,
            content: parse_json(&self.content)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Navigation item row.
#[derive(FromRow)]
pub struct DbNavItem {
    pub id: String,
    pub label: String,
    pub href: String,
    pub parent_id: Option<String>,
    pub position: i64,
    pub is_visible: bool,
}

impl DbNavItem {
    pub fn into_domain(self) -> Result<NavigationItem, RepoError> {
        Ok(NavigationItem {
            id: parse_id(&self.id)?,
            label: self.label,
            href: self.href,
            parent_id: self.parent_id.as_deref().map(parse_id).transpose()?,
            position: self.position,
            is_visible: self.is_visible,
        })
    }
}

/// Site setting row.
#[derive(FromRow)]
pub struct DbSetting {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl DbSetting {
    pub fn into_domain(self) -> Result<SiteSetting, RepoError> {
        Ok(SiteSetting {
            key: self.key,
            value: parse_json(&self.value)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Feature flag row.
#[derive(FromRow)]
pub struct DbFlag {
    pub key: String,
    pub enabled: bool,
    pub description: Option<String>,
    pub updated_at: String,
}

impl DbFlag {
    pub fn into_domain(self) -> Result<FeatureFlag, RepoError> {
        Ok(FeatureFlag {
            key: self.key,
            enabled: self.enabled,
            description: self.description,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// SEO metadata row.
#[derive(FromRow)]
pub struct DbSeo {
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: String,
    pub og_image: Option<String>,
    pub updated_at: String,
}

impl DbSeo {
    pub fn into_domain(self) -> Result<SeoMetadata, RepoError> {
        Ok(SeoMetadata {
            path: self.path,
            title: self.title,
            description: self.description,
            keywords: parse_json(&self.keywords)?,
            og_image: self.og_image,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Activity log row.
#[derive(FromRow)]
pub struct DbActivity {
    pub id: String,
    pub admin_user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub created_at: String,
}

impl DbActivity {
    pub fn into_domain(self) -> Result<ActivityEntry, RepoError> {
        Ok(ActivityEntry {
            id: parse_id(&self.id)?,
            admin_user_id: parse_id(&self.admin_user_id)?,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Single-column count result.
#[derive(FromRow)]
pub struct DbCount {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_round_trips_rfc3339() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(&now.to_rfc3339()).unwrap(), now);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_bad_role_is_rejected() {
        let row = DbAdminUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: "a@b.org".into(),
            name: "A".into(),
            password_hash: "h".into(),
            role: "janitor".into(),
            is_active: true,
            created_at: Utc::now().to_rfc3339(),
            last_login_at: None,
        };
        assert!(row.into_domain().is_err());
    }
}
