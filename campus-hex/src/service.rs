//! CMS Application Service
//!
//! Orchestrates domain operations through the repository port.
//! Contains NO infrastructure logic - validation, authorization rules and
//! activity logging only.

use chrono::Utc;

use campus_repo::security;
use campus_types::domain::validation::{require_text, validate_key, validate_path, validate_slug};
use campus_types::{
    ActivityEntry, ActivityQuery, AdminIdentity, AdminProfile, AdminRole, AdminUser, AppError,
    AuthError, BlogPost, BootstrapRequest, ContentRepository, CreateAdminRequest,
    CreatePostRequest, FeatureFlag, LoginRequest, LoginResponse, MAX_PAGE_SIZE, NavItemId,
    NavItemRequest, NavigationItem, Page, PostFilter, PostId, PostQuery, PostStatus, RepoError,
    SeoMetadata, SetFeatureFlagRequest, SiteSetting, UpdatePostRequest, UpsertPageRequest,
    UpsertSeoRequest, UpsertSettingRequest, DEFAULT_PAGE_SIZE,
};

use crate::token::TokenIssuer;

const DEFAULT_ACTIVITY_LIMIT: i64 = 50;

/// Application service for site content and admin accounts.
///
/// Generic over `R: ContentRepository` - the adapter is injected at compile time.
pub struct CmsService<R: ContentRepository> {
    repo: R,
    tokens: TokenIssuer,
}

fn normalise_tags(tags: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> Result<(i64, i64), AppError> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    let offset = offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::Validation("offset cannot be negative".into()));
    }
    Ok((limit, offset))
}

fn validate_post(post: &BlogPost) -> Result<(), AppError> {
    validate_slug(&post.slug)?;
    require_text("Title", &post.title, 200)?;
    require_text("Content", &post.content, 100_000)?;
    require_text("Category", &post.category, 64)?;
    require_text("Author", &post.author, 120)?;
    Ok(())
}

async fn hash_off_thread(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || security::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hash task failed: {}", e)))?
        .map_err(Into::into)
}

impl<R: ContentRepository> CmsService<R> {
    /// Creates a new service with the given repository and token issuer.
    pub fn new(repo: R, tokens: TokenIssuer) -> Self {
        Self { repo, tokens }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns the token issuer used for admin sessions.
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    async fn log(
        &self,
        actor: &AdminIdentity,
        action: &str,
        entity_type: &str,
        entity_id: Option<String>,
    ) {
        let entry = ActivityEntry::new(actor.user_id, action, entity_type, entity_id);
        if let Err(e) = self.repo.record_activity(&entry).await {
            tracing::warn!(error = %e, action, entity_type, "Failed to record activity");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Authentication & Admin Accounts
    // ─────────────────────────────────────────────────────────────────────────────

    /// Exchanges credentials for a signed token.
    ///
    /// Unknown email, wrong password and inactive accounts all fail the same way.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let email = req.email.trim().to_lowercase();
        let Some(user) = self.repo.find_admin_by_email(&email).await? else {
            tracing::info!("Login rejected: unknown account");
            return Err(AuthError::InvalidCredentials.into());
        };

        let stored = user.password_hash.clone();
        let password = req.password;
        let verified = tokio::task::spawn_blocking(move || {
            security::verify_password(&password, &stored)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password verify task failed: {}", e)))?;

        if !verified || !user.is_active {
            tracing::info!(user_id = %user.id, "Login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let identity = user.identity();
        let issued = self.tokens.issue(&identity)?;

        let now = Utc::now();
        self.repo.touch_admin_login(user.id, now).await?;
        self.log(&identity, "auth.login", "admin_user", Some(user.id.to_string()))
            .await;

        let mut profile = AdminProfile::from(user);
        profile.last_login_at = Some(now);
        Ok(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user: profile,
        })
    }

    /// Creates the first super admin. Refused once any admin exists.
    pub async fn bootstrap(&self, req: BootstrapRequest) -> Result<AdminProfile, AppError> {
        if self.repo.count_admins().await? > 0 {
            return Err(AppError::Conflict(
                "Bootstrap not allowed: an admin account already exists".into(),
            ));
        }

        security::validate_password(&req.password)?;
        let hash = hash_off_thread(req.password).await?;
        let user = AdminUser::new(&req.email, req.name, hash, AdminRole::SuperAdmin)?;
        self.repo
            .create_first_admin(&user)
            .await
            .map_err(|e| match e {
                RepoError::Conflict(_) => AppError::Conflict(
                    "Bootstrap not allowed: an admin account already exists".into(),
                ),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "Bootstrapped first super admin");
        self.log(&user.identity(), "admin.bootstrap", "admin_user", Some(user.id.to_string()))
            .await;
        Ok(user.into())
    }

    /// Creates another admin. Only super admins may do this.
    pub async fn create_admin(
        &self,
        actor: &AdminIdentity,
        req: CreateAdminRequest,
    ) -> Result<AdminProfile, AppError> {
        if !actor.role.can_manage_admins() {
            return Err(AppError::Forbidden(
                "Only super admins can create admin accounts".into(),
            ));
        }

        security::validate_password(&req.password)?;
        let hash = hash_off_thread(req.password).await?;
        let user = AdminUser::new(&req.email, req.name, hash, req.role)?;
        self.repo.create_admin(&user).await?;

        self.log(actor, "admin.create", "admin_user", Some(user.id.to_string()))
            .await;
        Ok(user.into())
    }

    /// Lists admin accounts.
    pub async fn list_admins(&self) -> Result<Vec<AdminProfile>, AppError> {
        let admins = self.repo.list_admins().await?;
        Ok(admins.into_iter().map(AdminProfile::from).collect())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Blog Posts
    // ─────────────────────────────────────────────────────────────────────────────

    /// Published posts for the public site.
    pub async fn list_published_posts(&self, query: PostQuery) -> Result<Vec<BlogPost>, AppError> {
        let (limit, offset) = page_bounds(query.limit, query.offset)?;
        let filter = PostFilter {
            category: query.category,
            status: Some(PostStatus::Published),
            limit,
            offset,
        };
        self.repo.list_posts(&filter).await.map_err(Into::into)
    }

    /// A published post by slug; drafts are reported as not found.
    pub async fn get_published_post(&self, slug: &str) -> Result<BlogPost, AppError> {
        self.repo
            .get_post_by_slug(slug)
            .await?
            .filter(BlogPost::is_published)
            .ok_or_else(|| AppError::NotFound(format!("Post {}", slug)))
    }

    /// All posts, optionally filtered by status, for the back office.
    pub async fn list_posts(&self, query: PostQuery) -> Result<Vec<BlogPost>, AppError> {
        let (limit, offset) = page_bounds(query.limit, query.offset)?;
        let filter = PostFilter {
            category: query.category,
            status: query.status,
            limit,
            offset,
        };
        self.repo.list_posts(&filter).await.map_err(Into::into)
    }

    /// Gets any post by ID.
    pub async fn get_post(&self, id: PostId) -> Result<BlogPost, AppError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {}", id)))
    }

    pub async fn create_post(
        &self,
        actor: &AdminIdentity,
        req: CreatePostRequest,
    ) -> Result<BlogPost, AppError> {
        let now = Utc::now();
        let mut post = BlogPost {
            id: PostId::new(),
            slug: req.slug,
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
            category: req.category.trim().to_lowercase(),
            author: req.author,
            cover_image: req.cover_image,
            tags: normalise_tags(req.tags),
            status: PostStatus::Draft,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        post.set_status(req.status, now);
        validate_post(&post)?;

        self.repo.create_post(&post).await?;
        self.log(actor, "post.create", "blog_post", Some(post.id.to_string()))
            .await;
        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: &AdminIdentity,
        id: PostId,
        req: UpdatePostRequest,
    ) -> Result<BlogPost, AppError> {
        let mut post = self.get_post(id).await?;
        let now = Utc::now();

        if let Some(slug) = req.slug {
            post.slug = slug;
        }
        if let Some(title) = req.title {
            post.title = title;
        }
        if let Some(excerpt) = req.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(content) = req.content {
            post.content = content;
        }
        if let Some(category) = req.category {
            post.category = category.trim().to_lowercase();
        }
        if let Some(author) = req.author {
            post.author = author;
        }
        if let Some(cover_image) = req.cover_image {
            post.cover_image = Some(cover_image);
        }
        if let Some(tags) = req.tags {
            post.tags = normalise_tags(tags);
        }
        if let Some(status) = req.status {
            post.set_status(status, now);
        }
        post.updated_at = now;
        validate_post(&post)?;

        self.repo.update_post(&post).await?;
        self.log(actor, "post.update", "blog_post", Some(id.to_string()))
            .await;
        Ok(post)
    }

    pub async fn delete_post(&self, actor: &AdminIdentity, id: PostId) -> Result<(), AppError> {
        if !self.repo.delete_post(id).await? {
            return Err(AppError::NotFound(format!("Post {}", id)));
        }
        self.log(actor, "post.delete", "blog_post", Some(id.to_string()))
            .await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Pages
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn get_page(&self, slug: &str) -> Result<Page, AppError> {
        self.repo
            .get_page(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Page {}", slug)))
    }

    pub async fn list_pages(&self) -> Result<Vec<Page>, AppError> {
        self.repo.list_pages().await.map_err(Into::into)
    }

    pub async fn upsert_page(
        &self,
        actor: &AdminIdentity,
        slug: &str,
        req: UpsertPageRequest,
    ) -> Result<Page, AppError> {
        validate_slug(slug)?;
        require_text("Title", &req.title, 200)?;
        if !req.content.is_object() && !req.content.is_array() {
            return Err(AppError::Validation(
                "Page content must be a JSON object or array".into(),
            ));
        }

        let page = Page {
            slug: slug.to_string(),
            title: req.title,
            content: req.content,
            updated_at: Utc::now(),
        };
        self.repo.upsert_page(&page).await?;
        self.log(actor, "page.upsert", "page", Some(page.slug.clone()))
            .await;
        Ok(page)
    }

    pub async fn delete_page(&self, actor: &AdminIdentity, slug: &str) -> Result<(), AppError> {
        if !self.repo.delete_page(slug).await? {
            return Err(AppError::NotFound(format!("Page {}", slug)));
        }
        self.log(actor, "page.delete", "page", Some(slug.to_string()))
            .await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Visible navigation items, ordered by position.
    pub async fn public_navigation(&self) -> Result<Vec<NavigationItem>, AppError> {
        let items = self.repo.list_nav_items().await?;
        Ok(items.into_iter().filter(|i| i.is_visible).collect())
    }

    pub async fn list_navigation(&self) -> Result<Vec<NavigationItem>, AppError> {
        self.repo.list_nav_items().await.map_err(Into::into)
    }

    async fn check_nav_item(
        &self,
        id: NavItemId,
        req: &NavItemRequest,
    ) -> Result<(), AppError> {
        require_text("Label", &req.label, 80)?;
        require_text("Link", &req.href, 512)?;
        if let Some(parent) = req.parent_id {
            if parent == id {
                return Err(AppError::Validation(
                    "A navigation item cannot be its own parent".into(),
                ));
            }
            if self.repo.get_nav_item(parent).await?.is_none() {
                return Err(AppError::Validation(format!(
                    "Parent navigation item {} does not exist",
                    parent
                )));
            }
        }
        Ok(())
    }

    pub async fn create_nav_item(
        &self,
        actor: &AdminIdentity,
        req: NavItemRequest,
    ) -> Result<NavigationItem, AppError> {
        let id = NavItemId::new();
        self.check_nav_item(id, &req).await?;

        let item = NavigationItem {
            id,
            label: req.label,
            href: req.href,
            parent_id: req.parent_id,
            position: req.position,
            is_visible: req.is_visible,
        };
        self.repo.create_nav_item(&item).await?;
        self.log(actor, "navigation.create", "navigation_item", Some(id.to_string()))
            .await;
        Ok(item)
    }

    pub async fn update_nav_item(
        &self,
        actor: &AdminIdentity,
        id: NavItemId,
        req: NavItemRequest,
    ) -> Result<NavigationItem, AppError> {
        self.check_nav_item(id, &req).await?;

        let item = NavigationItem {
            id,
            label: req.label,
            href: req.href,
            parent_id: req.parent_id,
            position: req.position,
            is_visible: req.is_visible,
        };
        self.repo.update_nav_item(&item).await?;
        self.log(actor, "navigation.update", "navigation_item", Some(id.to_string()))
            .await;
        Ok(item)
    }

    pub async fn delete_nav_item(
        &self,
        actor: &AdminIdentity,
        id: NavItemId,
    ) -> Result<(), AppError> {
        if !self.repo.delete_nav_item(id).await? {
            return Err(AppError::NotFound(format!("Navigation item {}", id)));
        }
        self.log(actor, "navigation.delete", "navigation_item", Some(id.to_string()))
            .await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Site Settings & Feature Flags
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn list_settings(&self) -> Result<Vec<SiteSetting>, AppError> {
        self.repo.list_settings().await.map_err(Into::into)
    }

    pub async fn upsert_setting(
        &self,
        actor: &AdminIdentity,
        key: &str,
        req: UpsertSettingRequest,
    ) -> Result<SiteSetting, AppError> {
        validate_key(key)?;
        let setting = SiteSetting {
            key: key.to_string(),
            value: req.value,
            updated_at: Utc::now(),
        };
        self.repo.upsert_setting(&setting).await?;
        self.log(actor, "setting.upsert", "site_setting", Some(setting.key.clone()))
            .await;
        Ok(setting)
    }

    pub async fn delete_setting(&self, actor: &AdminIdentity, key: &str) -> Result<(), AppError> {
        if !self.repo.delete_setting(key).await? {
            return Err(AppError::NotFound(format!("Setting {}", key)));
        }
        self.log(actor, "setting.delete", "site_setting", Some(key.to_string()))
            .await;
        Ok(())
    }

    pub async fn list_flags(&self) -> Result<Vec<FeatureFlag>, AppError> {
        self.repo.list_flags().await.map_err(Into::into)
    }

    pub async fn set_flag(
        &self,
        actor: &AdminIdentity,
        key: &str,
        req: SetFeatureFlagRequest,
    ) -> Result<FeatureFlag, AppError> {
        validate_key(key)?;
        let flag = FeatureFlag {
            key: key.to_string(),
            enabled: req.enabled,
            description: req.description,
            updated_at: Utc::now(),
        };
        self.repo.upsert_flag(&flag).await?;
        self.log(actor, "feature.set", "feature_flag", Some(flag.key.clone()))
            .await;
        Ok(flag)
    }

    pub async fn delete_flag(&self, actor: &AdminIdentity, key: &str) -> Result<(), AppError> {
        if !self.repo.delete_flag(key).await? {
            return Err(AppError::NotFound(format!("Feature flag {}", key)));
        }
        self.log(actor, "feature.delete", "feature_flag", Some(key.to_string()))
            .await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // SEO
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn get_seo(&self, path: &str) -> Result<SeoMetadata, AppError> {
        self.repo
            .get_seo(path)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("SEO metadata for {}", path)))
    }

    pub async fn list_seo(&self) -> Result<Vec<SeoMetadata>, AppError> {
        self.repo.list_seo().await.map_err(Into::into)
    }

    pub async fn upsert_seo(
        &self,
        actor: &AdminIdentity,
        req: UpsertSeoRequest,
    ) -> Result<SeoMetadata, AppError> {
        validate_path(&req.path)?;
        require_text("Title", &req.title, 70)?;
        if let Some(description) = &req.description {
            if description.chars().count() > 320 {
                return Err(AppError::Validation(
                    "SEO description must be at most 320 characters".into(),
                ));
            }
        }

        let seo = SeoMetadata {
            path: req.path,
            title: req.title,
            description: req.description,
            keywords: normalise_tags(req.keywords),
            og_image: req.og_image,
            updated_at: Utc::now(),
        };
        self.repo.upsert_seo(&seo).await?;
        self.log(actor, "seo.upsert", "seo_metadata", Some(seo.path.clone()))
            .await;
        Ok(seo)
    }

    pub async fn delete_seo(&self, actor: &AdminIdentity, path: &str) -> Result<(), AppError> {
        if !self.repo.delete_seo(path).await? {
            return Err(AppError::NotFound(format!("SEO metadata for {}", path)));
        }
        self.log(actor, "seo.delete", "seo_metadata", Some(path.to_string()))
            .await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Activity Log
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn list_activity(
        &self,
        query: ActivityQuery,
    ) -> Result<Vec<ActivityEntry>, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
        if !(1..=500).contains(&limit) {
            return Err(AppError::Validation("limit must be between 1 and 500".into()));
        }
        self.repo.list_activity(limit).await.map_err(Into::into)
    }
}
