//! SQLite repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;

use campus_types::{
    ActivityEntry, AdminUser, AdminUserId, BlogPost, ContentRepository, FeatureFlag, NavItemId,
    NavigationItem, Page, PostFilter, PostId, RepoError, SeoMetadata, SiteSetting,
};

use crate::types::{
    DbActivity, DbAdminUser, DbBlogPost, DbCount, DbFlag, DbNavItem, DbPage, DbSeo, DbSetting,
};

const MIGRATION: &str = include_str!("../migrations/0001_create_tables.sql");

const POST_COLUMNS: &str = "id, slug, title, excerpt, content, category, author, cover_image, \
                            tags, status, published_at, created_at, updated_at";

/// Maps a sqlx error, turning unique-constraint failures into `Conflict`.
fn db_err(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RepoError::Conflict(db.message().to_string());
        }
    }
    RepoError::Database(e.to_string())
}

fn json_text<T: serde::Serialize>(value: &T) -> Result<String, RepoError> {
    serde_json::to_string(value).map_err(|e| RepoError::Database(e.to_string()))
}

fn ts(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };
        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::debug!(in_memory, "SQLite schema ready");
        Ok(repo)
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        sqlx::raw_sql(MIGRATION)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ContentRepository for SqliteRepo {
    async fn create_admin(&self, admin: &AdminUser) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO admin_users (id, email, name, password_hash, role, is_active,
                                        created_at, last_login_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(admin.id.to_string())
        .bind(&admin.email)
        .bind(&admin.name)
        .bind(&admin.password_hash)
        .bind(admin.role.to_string())
        .bind(admin.is_active)
        .bind(ts(&admin.created_at))
        .bind(admin.last_login_at.as_ref().map(ts))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn create_first_admin(&self, admin: &AdminUser) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"INSERT INTO admin_users (id, email, name, password_hash, role, is_active,
                                        created_at, last_login_at)
               SELECT ?, ?, ?, ?, ?, ?, ?, ?
               WHERE NOT EXISTS (SELECT 1 FROM admin_users)"#,
        )
        .bind(admin.id.to_string())
        .bind(&admin.email)
        .bind(&admin.name)
        .bind(&admin.password_hash)
        .bind(admin.role.to_string())
        .bind(admin.is_active)
        .bind(ts(&admin.created_at))
        .bind(admin.last_login_at.as_ref().map(ts))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::Conflict("an admin account already exists".into()));
        }
        Ok(())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, RepoError> {
        let row: Option<DbAdminUser> = sqlx::query_as(
            r#"SELECT id, email, name, password_hash, role, is_active, created_at, last_login_at
               FROM admin_users WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbAdminUser::into_domain).transpose()
    }

    async fn list_admins(&self) -> Result<Vec<AdminUser>, RepoError> {
        let rows: Vec<DbAdminUser> = sqlx::query_as(
            r#"SELECT id, email, name, password_hash, role, is_active, created_at, last_login_at
               FROM admin_users ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbAdminUser::into_domain).collect()
    }

    async fn count_admins(&self) -> Result<i64, RepoError> {
        let row: DbCount = sqlx::query_as(r#"SELECT COUNT(*) AS count FROM admin_users"#)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.count)
    }

    async fn touch_admin_login(
        &self,
        id: AdminUserId,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(r#"UPDATE admin_users SET last_login_at = ? WHERE id = ?"#)
            .bind(ts(&at))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn create_post(&self, post: &BlogPost) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO blog_posts (id, slug, title, excerpt, content, category, author, cover_image,
                                       tags, status, published_at, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(post.id.to_string())
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(&post.author)
        .bind(&post.cover_image)
        .bind(json_text(&post.tags)?)
        .bind(post.status.to_string())
        .bind(post.published_at.as_ref().map(ts))
        .bind(ts(&post.created_at))
        .bind(ts(&post.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_post(&self, id: PostId) -> Result<Option<BlogPost>, RepoError> {
        let row: Option<DbBlogPost> = sqlx::query_as(&format!(
            "SELECT {} FROM blog_posts WHERE id = ?",
            POST_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbBlogPost::into_domain).transpose()
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, RepoError> {
        let row: Option<DbBlogPost> = sqlx::query_as(&format!(
            "SELECT {} FROM blog_posts WHERE slug = ?",
            POST_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbBlogPost::into_domain).transpose()
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<BlogPost>, RepoError> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM blog_posts WHERE 1 = 1", POST_COLUMNS));

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.to_string());
        }
        query
            .push(" ORDER BY COALESCE(published_at, created_at) DESC, created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows: Vec<DbBlogPost> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(DbBlogPost::into_domain).collect()
    }

    async fn update_post(&self, post: &BlogPost) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE blog_posts
               SET slug = ?, title = ?, excerpt = ?, content = ?, category = ?, author = ?,
                   cover_image = ?, tags = ?, status = ?, published_at = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(&post.author)
        .bind(&post.cover_image)
        .bind(json_text(&post.tags)?)
        .bind(post.status.to_string())
        .bind(post.published_at.as_ref().map(ts))
        .bind(ts(&post.updated_at))
        .bind(post.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_post(&self, id: PostId) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM blog_posts WHERE id = ?"#)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_page(&self, page: &Page) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO pages (slug, title, content, updated_at) VALUES (?, ?, ?, ?)
               ON CONFLICT (slug) DO UPDATE
               SET title = excluded.title, content = excluded.content, updated_at = excluded.updated_at"#,
        )
        .bind(&page.slug)
        .bind(&page.title)
        .bind(json_text(&page.content)?)
        .bind(ts(&page.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_page(&self, slug: &str) -> Result<Option<Page>, RepoError> {
        let row: Option<DbPage> =
            sqlx::query_as(r#"SELECT slug, title, content, updated_at FROM pages WHERE slug = ?"#)
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        row.map(DbPage::into_domain).transpose()
    }

    async fn list_pages(&self) -> Result<Vec<Page>, RepoError> {
        let rows: Vec<DbPage> =
            sqlx::query_as(r#"SELECT slug, title, content, updated_at FROM pages ORDER BY slug"#)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        rows.into_iter().map(DbPage::into_domain).collect()
    }

    async fn delete_page(&self, slug: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM pages WHERE slug = ?"#)
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_nav_item(&self, item: &NavigationItem) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO navigation_items (id, label, href, parent_id, position, is_visible)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(item.id.to_string())
        .bind(&item.label)
        .bind(&item.href)
        .bind(item.parent_id.map(|p| p.to_string()))
        .bind(item.position)
        .bind(item.is_visible)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_nav_item(&self, id: NavItemId) -> Result<Option<NavigationItem>, RepoError> {
        let row: Option<DbNavItem> = sqlx::query_as(
            r#"SELECT id, label, href, parent_id, position, is_visible
               FROM navigation_items WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbNavItem::into_domain).transpose()
    }

    async fn list_nav_items(&self) -> Result<Vec<NavigationItem>, RepoError> {
        let rows: Vec<DbNavItem> = sqlx::query_as(
            r#"SELECT id, label, href, parent_id, position, is_visible
               FROM navigation_items ORDER BY position ASC, label ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbNavItem::into_domain).collect()
    }

    async fn update_nav_item(&self, item: &NavigationItem) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE navigation_items
               SET label = ?, href = ?, parent_id = ?, position = ?, is_visible = ?
               WHERE id = ?"#,
        )
        .bind(&item.label)
        .bind(&item.href)
        .bind(item.parent_id.map(|p| p.to_string()))
        .bind(item.position)
        .bind(item.is_visible)
        .bind(item.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_nav_item(&self, id: NavItemId) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM navigation_items WHERE id = ?"#)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_setting(&self, setting: &SiteSetting) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO site_settings (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(&setting.key)
        .bind(json_text(&setting.value)?)
        .bind(ts(&setting.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_settings(&self) -> Result<Vec<SiteSetting>, RepoError> {
        let rows: Vec<DbSetting> =
            sqlx::query_as(r#"SELECT key, value, updated_at FROM site_settings ORDER BY key"#)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        rows.into_iter().map(DbSetting::into_domain).collect()
    }

    async fn delete_setting(&self, key: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM site_settings WHERE key = ?"#)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_flag(&self, flag: &FeatureFlag) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO feature_flags (key, enabled, description, updated_at) VALUES (?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE
               SET enabled = excluded.enabled,
                   description = COALESCE(excluded.description, feature_flags.description),
                   updated_at = excluded.updated_at"#,
        )
        .bind(&flag.key)
        .bind(flag.enabled)
        .bind(&flag.description)
        .bind(ts(&flag.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_flags(&self) -> Result<Vec<FeatureFlag>, RepoError> {
        let rows: Vec<DbFlag> = sqlx::query_as(
            r#"SELECT key, enabled, description, updated_at FROM feature_flags ORDER BY key"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbFlag::into_domain).collect()
    }

    async fn delete_flag(&self, key: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM feature_flags WHERE key = ?"#)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_seo(&self, seo: &SeoMetadata) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO seo_metadata (path, title, description, keywords, og_image, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT (path) DO UPDATE
               SET title = excluded.title, description = excluded.description,
                   keywords = excluded.keywords, og_image = excluded.og_image,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&seo.path)
        .bind(&seo.title)
        .bind(&seo.description)
        .bind(json_text(&seo.keywords)?)
        .bind(&seo.og_image)
        .bind(ts(&seo.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_seo(&self, path: &str) -> Result<Option<SeoMetadata>, RepoError> {
        let row: Option<DbSeo> = sqlx::query_as(
            r#"SELECT path, title, description, keywords, og_image, updated_at
               FROM seo_metadata WHERE path = ?"#,
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbSeo::into_domain).transpose()
    }

    async fn list_seo(&self) -> Result<Vec<SeoMetadata>, RepoError> {
        let rows: Vec<DbSeo> = sqlx::query_as(
            r#"SELECT path, title, description, keywords, og_image, updated_at
               FROM seo_metadata ORDER BY path"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbSeo::into_domain).collect()
    }

    async fn delete_seo(&self, path: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM seo_metadata WHERE path = ?"#)
            .bind(path)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_activity(&self, entry: &ActivityEntry) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO activity_log (id, admin_user_id, action, entity_type, entity_id, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.id.to_string())
        .bind(entry.admin_user_id.to_string())
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(ts(&entry.created_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>, RepoError> {
        let rows: Vec<DbActivity> = sqlx::query_as(
            r#"SELECT id, admin_user_id, action, entity_type, entity_id, created_at
               FROM activity_log ORDER BY created_at DESC LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbActivity::into_domain).collect()
    }
}
