//! Site content managed through the back office.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

uuid_id! {
    /// Unique identifier for a blog post.
    PostId
}

uuid_id! {
    /// Unique identifier for a navigation item.
    NavItemId
}

/// Publication state of a blog post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Draft => f.write_str("draft"),
            PostStatus::Published => f.write_str("published"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("Invalid post status: {}", other)),
        }
    }
}

/// A news or blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: PostId,
    #[schema(example = "sports-day-results")]
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    #[schema(example = "events")]
    pub category: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Moves the post to `status`, stamping `published_at` on first publication.
    pub fn set_status(&mut self, status: PostStatus, now: DateTime<Utc>) {
        if status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.status = status;
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// Editable content for a static page such as `about` or `admissions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[schema(example = "admissions")]
    pub slug: String,
    pub title: String,
    /// Page sections as free-form JSON
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// An entry in the site's header navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub id: NavItemId,
    #[schema(example = "Academics")]
    pub label: String,
    #[schema(example = "/academics")]
    pub href: String,
    pub parent_id: Option<NavItemId>,
    pub position: i64,
    pub is_visible: bool,
}

/// A key/value site setting (school name, contact phone, social links...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteSetting {
    #[schema(example = "contact.phone")]
    pub key: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// A toggle for optional site sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlag {
    #[schema(example = "gallery")]
    pub key: String,
    pub enabled: bool,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Search-engine metadata for one site path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    #[schema(example = "/admissions")]
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub og_image: Option<String>,
    pub updated_at: DateTime<Utc>,
}
