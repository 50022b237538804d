//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (SQLite, in-memory mocks) implement this trait.

use chrono::{DateTime, Utc};

use crate::domain::{
    ActivityEntry, AdminUser, AdminUserId, BlogPost, FeatureFlag, NavItemId, NavigationItem,
    Page, PostId, SeoMetadata, SiteSetting,
};
use crate::dto::PostFilter;
use crate::error::RepoError;

/// Persistence for all managed site content.
///
/// Uniqueness violations (admin email, post slug) are reported as
/// `RepoError::Conflict`; updates of missing rows as `RepoError::NotFound`.
#[async_trait::async_trait]
pub trait ContentRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Admin Users
    // ─────────────────────────────────────────────────────────────────────────────

    /// Inserts a new admin.
    async fn create_admin(&self, admin: &AdminUser) -> Result<(), RepoError>;

    /// Inserts `admin` only if no admin exists yet, as a single statement.
    ///
    /// Returns `RepoError::Conflict` when any admin is already present.
    async fn create_first_admin(&self, admin: &AdminUser) -> Result<(), RepoError>;

    /// Finds an admin by (normalised) email.
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, RepoError>;

    /// Lists all admins.
    async fn list_admins(&self) -> Result<Vec<AdminUser>, RepoError>;

    /// Counts admins.
    async fn count_admins(&self) -> Result<i64, RepoError>;

    /// Records a successful login.
    async fn touch_admin_login(
        &self,
        id: AdminUserId,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Blog Posts
    // ─────────────────────────────────────────────────────────────────────────────

    async fn create_post(&self, post: &BlogPost) -> Result<(), RepoError>;

    async fn get_post(&self, id: PostId) -> Result<Option<BlogPost>, RepoError>;

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, RepoError>;

    /// Lists posts newest first (by publication, then creation time).
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<BlogPost>, RepoError>;

    async fn update_post(&self, post: &BlogPost) -> Result<(), RepoError>;

    /// Returns `false` when no post had this id.
    async fn delete_post(&self, id: PostId) -> Result<bool, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Pages
    // ─────────────────────────────────────────────────────────────────────────────

    async fn upsert_page(&self, page: &Page) -> Result<(), RepoError>;

    async fn get_page(&self, slug: &str) -> Result<Option<Page>, RepoError>;

    async fn list_pages(&self) -> Result<Vec<Page>, RepoError>;

    async fn delete_page(&self, slug: &str) -> Result<bool, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────────

    async fn create_nav_item(&self, item: &NavigationItem) -> Result<(), RepoError>;

    async fn get_nav_item(&self, id: NavItemId) -> Result<Option<NavigationItem>, RepoError>;

    /// Lists items ordered by position.
    async fn list_nav_items(&self) -> Result<Vec<NavigationItem>, RepoError>;

    async fn update_nav_item(&self, item: &NavigationItem) -> Result<(), RepoError>;

    /// Deletes an item; children are detached to the top level.
    async fn delete_nav_item(&self, id: NavItemId) -> Result<bool, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Settings, Feature Flags, SEO
    // ─────────────────────────────────────────────────────────────────────────────

    async fn upsert_setting(&self, setting: &SiteSetting) -> Result<(), RepoError>;

    async fn list_settings(&self) -> Result<Vec<SiteSetting>, RepoError>;

    async fn delete_setting(&self, key: &str) -> Result<bool, RepoError>;

    async fn upsert_flag(&self, flag: &FeatureFlag) -> Result<(), RepoError>;

    async fn list_flags(&self) -> Result<Vec<FeatureFlag>, RepoError>;

    async fn delete_flag(&self, key: &str) -> Result<bool, RepoError>;

    async fn upsert_seo(&self, seo: &SeoMetadata) -> Result<(), RepoError>;

    async fn get_seo(&self, path: &str) -> Result<Option<SeoMetadata>, RepoError>;

    async fn list_seo(&self) -> Result<Vec<SeoMetadata>, RepoError>;

    async fn delete_seo(&self, path: &str) -> Result<bool, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Activity Log
    // ─────────────────────────────────────────────────────────────────────────────

    async fn record_activity(&self, entry: &ActivityEntry) -> Result<(), RepoError>;

    /// Most recent entries first.
    async fn list_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>, RepoError>;
}
