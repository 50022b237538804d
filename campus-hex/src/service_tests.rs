//! CmsService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use campus_types::{
        ActivityEntry, ActivityQuery, AdminIdentity, AdminRole, AdminUser, AdminUserId, AppError,
        BlogPost, BootstrapRequest, ContentRepository, CreateAdminRequest, CreatePostRequest,
        FeatureFlag, LoginRequest, NavItemId, NavItemRequest, NavigationItem, Page, PostFilter,
        PostId, PostQuery, PostStatus, RepoError, SeoMetadata, SiteSetting, UpdatePostRequest,
        UpsertPageRequest, UpsertSettingRequest,
    };

    use crate::{CmsService, TokenIssuer};

    /// Simple in-memory repository for testing the service layer.
    #[derive(Default)]
    pub struct MockRepo {
        admins: Mutex<HashMap<AdminUserId, AdminUser>>,
        posts: Mutex<HashMap<PostId, BlogPost>>,
        pages: Mutex<HashMap<String, Page>>,
        nav: Mutex<HashMap<NavItemId, NavigationItem>>,
        settings: Mutex<HashMap<String, SiteSetting>>,
        flags: Mutex<HashMap<String, FeatureFlag>>,
        seo: Mutex<HashMap<String, SeoMetadata>>,
        activity: Mutex<Vec<ActivityEntry>>,
        activity_down: AtomicBool,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent activity insert fail.
        pub fn break_activity_log(&self) {
            self.activity_down.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ContentRepository for MockRepo {
        async fn create_admin(&self, admin: &AdminUser) -> Result<(), RepoError> {
            let mut admins = self.admins.lock().unwrap();
            if admins.values().any(|a| a.email == admin.email) {
                return Err(RepoError::Conflict("email already registered".into()));
            }
            admins.insert(admin.id, admin.clone());
            Ok(())
        }

        async fn create_first_admin(&self, admin: &AdminUser) -> Result<(), RepoError> {
            let mut admins = self.admins.lock().unwrap();
            if !admins.is_empty() {
                return Err(RepoError::Conflict("an admin account already exists".into()));
            }
            admins.insert(admin.id, admin.clone());
            Ok(())
        }

        async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>, RepoError> {
            Ok(self
                .admins
                .lock()
                .unwrap()
                .values()
                .find(|a| a.email == email)
                .cloned())
        }

        async fn list_admins(&self) -> Result<Vec<AdminUser>, RepoError> {
            Ok(self.admins.lock().unwrap().values().cloned().collect())
        }

        async fn count_admins(&self) -> Result<i64, RepoError> {
            Ok(self.admins.lock().unwrap().len() as i64)
        }

        async fn touch_admin_login(
            &self,
            id: AdminUserId,
            at: DateTime<Utc>,
        ) -> Result<(), RepoError> {
            let mut admins = self.admins.lock().unwrap();
            let admin = admins.get_mut(&id).ok_or(RepoError::NotFound)?;
            admin.last_login_at = Some(at);
            Ok(())
        }

        async fn create_post(&self, post: &BlogPost) -> Result<(), RepoError> {
            let mut posts = self.posts.lock().unwrap();
            if posts.values().any(|p| p.slug == post.slug) {
                return Err(RepoError::Conflict("slug already used".into()));
            }
            posts.insert(post.id, post.clone());
            Ok(())
        }

        async fn get_post(&self, id: PostId) -> Result<Option<BlogPost>, RepoError> {
            Ok(self.posts.lock().unwrap().get(&id).cloned())
        }

        async fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, RepoError> {
            Ok(self
                .posts
                .lock()
                .unwrap()
                .values()
                .find(|p| p.slug == slug)
                .cloned())
        }

        async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<BlogPost>, RepoError> {
            let mut posts: Vec<BlogPost> = self
                .posts
                .lock()
                .unwrap()
                .values()
                .filter(|p| filter.status.is_none_or(|s| p.status == s))
                .filter(|p| filter.category.as_ref().is_none_or(|c| &p.category == c))
                .cloned()
                .collect();
            posts.sort_by_key(|p| std::cmp::Reverse(p.published_at.unwrap_or(p.created_at)));
            Ok(posts
                .into_iter()
                .skip(filter.offset as usize)
                .take(filter.limit as usize)
                .collect())
        }

        async fn update_post(&self, post: &BlogPost) -> Result<(), RepoError> {
            let mut posts = self.posts.lock().unwrap();
            if posts.values().any(|p| p.slug == post.slug && p.id != post.id) {
                return Err(RepoError::Conflict("slug already used".into()));
            }
            let existing = posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
            *existing = post.clone();
            Ok(())
        }

        async fn delete_post(&self, id: PostId) -> Result<bool, RepoError> {
            Ok(self.posts.lock().unwrap().remove(&id).is_some())
        }

        async fn upsert_page(&self, page: &Page) -> Result<(), RepoError> {
            self.pages
                .lock()
                .unwrap()
                .insert(page.slug.clone(), page.clone());
            Ok(())
        }

        async fn get_page(&self, slug: &str) -> Result<Option<Page>, RepoError> {
            Ok(self.pages.lock().unwrap().get(slug).cloned())
        }

        async fn list_pages(&self) -> Result<Vec<Page>, RepoError> {
            Ok(self.pages.lock().unwrap().values().cloned().collect())
        }

        async fn delete_page(&self, slug: &str) -> Result<bool, RepoError> {
            Ok(self.pages.lock().unwrap().remove(slug).is_some())
        }

        async fn create_nav_item(&self, item: &NavigationItem) -> Result<(), RepoError> {
            self.nav.lock().unwrap().insert(item.id, item.clone());
            Ok(())
        }

        async fn get_nav_item(&self, id: NavItemId) -> Result<Option<NavigationItem>, RepoError> {
            Ok(self.nav.lock().unwrap().get(&id).cloned())
        }

        async fn list_nav_items(&self) -> Result<Vec<NavigationItem>, RepoError> {
            let mut items: Vec<_> = self.nav.lock().unwrap().values().cloned().collect();
            items.sort_by_key(|i| i.position);
            Ok(items)
        }

        async fn update_nav_item(&self, item: &NavigationItem) -> Result<(), RepoError> {
            let mut nav = self.nav.lock().unwrap();
            let existing = nav.get_mut(&item.id).ok_or(RepoError::NotFound)?;
            *existing = item.clone();
            Ok(())
        }

        async fn delete_nav_item(&self, id: NavItemId) -> Result<bool, RepoError> {
            let mut nav = self.nav.lock().unwrap();
            let removed = nav.remove(&id).is_some();
            for child in nav.values_mut().filter(|i| i.parent_id == Some(id)) {
                child.parent_id = None;
            }
            Ok(removed)
        }

        async fn upsert_setting(&self, setting: &SiteSetting) -> Result<(), RepoError> {
            self.settings
                .lock()
                .unwrap()
                .insert(setting.key.clone(), setting.clone());
            Ok(())
        }

        async fn list_settings(&self) -> Result<Vec<SiteSetting>, RepoError> {
            Ok(self.settings.lock().unwrap().values().cloned().collect())
        }

        async fn delete_setting(&self, key: &str) -> Result<bool, RepoError> {
            Ok(self.settings.lock().unwrap().remove(key).is_some())
        }

        async fn upsert_flag(&self, flag: &FeatureFlag) -> Result<(), RepoError> {
            let mut flags = self.flags.lock().unwrap();
            let description = flag
                .description
                .clone()
                .or_else(|| flags.get(&flag.key).and_then(|f| f.description.clone()));
            flags.insert(
                flag.key.clone(),
                FeatureFlag {
                    description,
                    ..flag.clone()
                },
            );
            Ok(())
        }

        async fn list_flags(&self) -> Result<Vec<FeatureFlag>, RepoError> {
            Ok(self.flags.lock().unwrap().values().cloned().collect())
        }

        async fn delete_flag(&self, key: &str) -> Result<bool, RepoError> {
            Ok(self.flags.lock().unwrap().remove(key).is_some())
        }

        async fn upsert_seo(&self, seo: &SeoMetadata) -> Result<(), RepoError> {
            self.seo
                .lock()
                .unwrap()
                .insert(seo.path.clone(), seo.clone());
            Ok(())
        }

        async fn get_seo(&self, path: &str) -> Result<Option<SeoMetadata>, RepoError> {
            Ok(self.seo.lock().unwrap().get(path).cloned())
        }

        async fn list_seo(&self) -> Result<Vec<SeoMetadata>, RepoError> {
            Ok(self.seo.lock().unwrap().values().cloned().collect())
        }

        async fn delete_seo(&self, path: &str) -> Result<bool, RepoError> {
            Ok(self.seo.lock().unwrap().remove(path).is_some())
        }

        async fn record_activity(&self, entry: &ActivityEntry) -> Result<(), RepoError> {
            if self.activity_down.load(Ordering::SeqCst) {
                return Err(RepoError::Database("activity table unavailable".into()));
            }
            self.activity.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn list_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>, RepoError> {
            Ok(self
                .activity
                .lock()
                .unwrap()
                .iter()
                .rev()
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    const SECRET: &[u8] = b"test-secret-key-at-least-32-characters-long";
    const PASSWORD: &str = "correct horse battery";

    fn service() -> CmsService<MockRepo> {
        CmsService::new(
            MockRepo::new(),
            TokenIssuer::new(SECRET, chrono::Duration::hours(1)),
        )
    }

    fn actor(role: AdminRole) -> AdminIdentity {
        AdminIdentity {
            user_id: AdminUserId::new(),
            email: "office@school.edu".into(),
            role,
        }
    }

    fn post_request(slug: &str, status: PostStatus) -> CreatePostRequest {
        CreatePostRequest {
            slug: slug.into(),
            title: "Science Fair Winners".into(),
            excerpt: None,
            content: "Congratulations to all participants.".into(),
            category: "Achievements".into(),
            author: "Office".into(),
            cover_image: None,
            tags: vec!["Science".into(), "science".into(), " ".into()],
            status,
        }
    }

    async fn bootstrap(service: &CmsService<MockRepo>) {
        service
            .bootstrap(BootstrapRequest {
                email: "Principal@School.edu".into(),
                name: "Principal".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_creates_super_admin_once() {
        let service = service();

        bootstrap(&service).await;

        let admins = service.list_admins().await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].role, AdminRole::SuperAdmin);
        assert_eq!(admins[0].email, "principal@school.edu");

        let again = service
            .bootstrap(BootstrapRequest {
                email: "other@school.edu".into(),
                name: "Other".into(),
                password: PASSWORD.into(),
            })
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_concurrent_bootstraps_create_one_super_admin() {
        let service = service();
        let request = |n: u32| BootstrapRequest {
            email: format!("head{}@school.edu", n),
            name: format!("Head {}", n),
            password: PASSWORD.into(),
        };

        let (a, b, c, d) = tokio::join!(
            service.bootstrap(request(1)),
            service.bootstrap(request(2)),
            service.bootstrap(request(3)),
            service.bootstrap(request(4)),
        );

        let results = [a, b, c, d];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| matches!(e, AppError::Conflict(_)))
        );
        assert_eq!(service.list_admins().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_short_password() {
        let result = service()
            .bootstrap(BootstrapRequest {
                email: "principal@school.edu".into(),
                name: "Principal".into(),
                password: "short".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let service = service();
        bootstrap(&service).await;

        let session = service
            .login(LoginRequest {
                email: "principal@school.edu".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();

        let identity = service.tokens().verify(&session.token).unwrap();
        assert_eq!(identity.user_id, session.user.id);
        assert_eq!(identity.role, AdminRole::SuperAdmin);
        assert!(session.user.last_login_at.is_some());

        let activity = service.list_activity(ActivityQuery::default()).await.unwrap();
        assert_eq!(activity[0].action, "auth.login");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        bootstrap(&service).await;

        let wrong_password = service
            .login(LoginRequest {
                email: "principal@school.edu".into(),
                password: "not the password".into(),
            })
            .await;
        let unknown_email = service
            .login(LoginRequest {
                email: "nobody@school.edu".into(),
                password: PASSWORD.into(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AppError::Unauthorized)));
        assert!(matches!(unknown_email, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_inactive_admin_cannot_login() {
        let service = service();
        let hash = campus_repo::security::hash_password(PASSWORD).unwrap();
        let mut user =
            AdminUser::new("former@school.edu", "Former".into(), hash, AdminRole::Editor).unwrap();
        user.is_active = false;
        service.repo().create_admin(&user).await.unwrap();

        let result = service
            .login(LoginRequest {
                email: "former@school.edu".into(),
                password: PASSWORD.into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_only_super_admin_creates_admins() {
        let service = service();
        let request = CreateAdminRequest {
            email: "librarian@school.edu".into(),
            name: "Librarian".into(),
            password: PASSWORD.into(),
            role: AdminRole::Editor,
        };

        let denied = service
            .create_admin(&actor(AdminRole::Admin), request.clone())
            .await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        let created = service
            .create_admin(&actor(AdminRole::SuperAdmin), request)
            .await
            .unwrap();
        assert_eq!(created.role, AdminRole::Editor);
    }

    #[tokio::test]
    async fn test_create_post_normalises_and_stamps_publication() {
        let service = service();
        let editor = actor(AdminRole::Editor);

        let draft = service
            .create_post(&editor, post_request("draft-post", PostStatus::Draft))
            .await
            .unwrap();
        assert!(draft.published_at.is_none());
        assert_eq!(draft.category, "achievements");
        assert_eq!(draft.tags, vec!["science".to_string()]);

        let published = service
            .create_post(&editor, post_request("live-post", PostStatus::Published))
            .await
            .unwrap();
        let first_published_at = published.published_at.unwrap();

        let updated = service
            .update_post(
                &editor,
                published.id,
                UpdatePostRequest {
                    title: Some("Updated".into()),
                    status: Some(PostStatus::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.published_at, Some(first_published_at));
    }

    #[tokio::test]
    async fn test_invalid_slug_rejected() {
        let result = service()
            .create_post(
                &actor(AdminRole::Editor),
                post_request("Not A Slug", PostStatus::Draft),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_drafts_hidden_from_public() {
        let service = service();
        let editor = actor(AdminRole::Editor);
        service
            .create_post(&editor, post_request("secret", PostStatus::Draft))
            .await
            .unwrap();
        service
            .create_post(&editor, post_request("public", PostStatus::Published))
            .await
            .unwrap();

        let public = service
            .list_published_posts(PostQuery::default())
            .await
            .unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].slug, "public");

        assert!(matches!(
            service.get_published_post("secret").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_page_size_bounds() {
        let service = service();
        for limit in [0, 101] {
            let result = service
                .list_published_posts(PostQuery {
                    limit: Some(limit),
                    ..Default::default()
                })
                .await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_update_missing_post_not_found() {
        let result = service()
            .update_post(
                &actor(AdminRole::Editor),
                PostId::new(),
                UpdatePostRequest::default(),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_navigation_parent_rules() {
        let service = service();
        let editor = actor(AdminRole::Editor);
        let request = |parent_id: Option<NavItemId>, is_visible: bool| NavItemRequest {
            label: "Academics".into(),
            href: "/academics".into(),
            parent_id,
            position: 1,
            is_visible,
        };

        let unknown_parent = service
            .create_nav_item(&editor, request(Some(NavItemId::new()), true))
            .await;
        assert!(matches!(unknown_parent, Err(AppError::Validation(_))));

        let root = service
            .create_nav_item(&editor, request(None, true))
            .await
            .unwrap();
        let self_parent = service
            .update_nav_item(&editor, root.id, request(Some(root.id), true))
            .await;
        assert!(matches!(self_parent, Err(AppError::Validation(_))));

        service
            .create_nav_item(&editor, request(Some(root.id), false))
            .await
            .unwrap();
        assert_eq!(service.public_navigation().await.unwrap().len(), 1);
        assert_eq!(service.list_navigation().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_setting_key_and_page_content_validated() {
        let service = service();
        let editor = actor(AdminRole::Editor);

        let bad_key = service
            .upsert_setting(
                &editor,
                "Site Name",
                UpsertSettingRequest {
                    value: serde_json::json!("Hillside"),
                },
            )
            .await;
        assert!(matches!(bad_key, Err(AppError::Validation(_))));

        let bad_page = service
            .upsert_page(
                &editor,
                "about",
                UpsertPageRequest {
                    title: "About".into(),
                    content: serde_json::json!("just a string"),
                },
            )
            .await;
        assert!(matches!(bad_page, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_mutations_are_logged() {
        let service = service();
        let editor = actor(AdminRole::Editor);
        let post = service
            .create_post(&editor, post_request("logged", PostStatus::Draft))
            .await
            .unwrap();
        service.delete_post(&editor, post.id).await.unwrap();

        let activity = service.list_activity(ActivityQuery::default()).await.unwrap();
        let actions: Vec<_> = activity.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["post.delete", "post.create"]);
        assert!(activity.iter().all(|a| a.admin_user_id == editor.user_id));

        assert!(matches!(
            service.delete_post(&editor, post.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_activity_log_failure_does_not_fail_mutation() {
        let service = service();
        let editor = actor(AdminRole::Editor);
        service.repo().break_activity_log();

        let post = service
            .create_post(&editor, post_request("still-saved", PostStatus::Draft))
            .await
            .unwrap();

        assert_eq!(service.get_post(post.id).await.unwrap().slug, "still-saved");
        service.delete_post(&editor, post.id).await.unwrap();
        assert!(service.list_activity(ActivityQuery::default()).await.unwrap().is_empty());
    }
}
