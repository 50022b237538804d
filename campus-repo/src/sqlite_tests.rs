//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use campus_types::{
        ActivityEntry, AdminRole, AdminUser, BlogPost, ContentRepository, FeatureFlag,
        NavItemId, NavigationItem, Page, PostFilter, PostId, PostStatus, RepoError, SeoMetadata,
        SiteSetting,
    };

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn admin(email: &str) -> AdminUser {
        AdminUser::new(email, "Office".into(), "$argon2id$fake".into(), AdminRole::Admin).unwrap()
    }

    fn post(slug: &str, category: &str, status: PostStatus) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: PostId::new(),
            slug: slug.into(),
            title: format!("Post {}", slug),
            excerpt: None,
            content: "Body".into(),
            category: category.into(),
            author: "Office".into(),
            cover_image: None,
            tags: vec!["school".into()],
            status,
            published_at: (status == PostStatus::Published).then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn nav(label: &str, position: i64, parent: Option<NavItemId>) -> NavigationItem {
        NavigationItem {
            id: NavItemId::new(),
            label: label.into(),
            href: format!("/{}", label.to_lowercase()),
            parent_id: parent,
            position,
            is_visible: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_admin() {
        let repo = setup_repo().await;
        let user = admin("office@school.edu");

        repo.create_admin(&user).await.unwrap();

        let found = repo
            .find_admin_by_email("office@school.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.role, AdminRole::Admin);
        assert_eq!(found.password_hash, user.password_hash);
        assert_eq!(repo.count_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_admin_email_conflicts() {
        let repo = setup_repo().await;
        repo.create_admin(&admin("office@school.edu")).await.unwrap();

        let result = repo.create_admin(&admin("office@school.edu")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_first_admin_only_once() {
        let repo = setup_repo().await;

        let (one, two, three) = (
            admin("one@school.edu"),
            admin("two@school.edu"),
            admin("three@school.edu"),
        );
        let (a, b, c) = tokio::join!(
            repo.create_first_admin(&one),
            repo.create_first_admin(&two),
            repo.create_first_admin(&three),
        );

        let inserted = [a, b, c];
        assert_eq!(inserted.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            inserted
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| matches!(e, RepoError::Conflict(_)))
        );
        assert_eq!(repo.count_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_first_admin_conflicts_after_any_admin() {
        let repo = setup_repo().await;
        repo.create_admin(&admin("office@school.edu")).await.unwrap();

        let result = repo.create_first_admin(&admin("head@school.edu")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_touch_admin_login() {
        let repo = setup_repo().await;
        let user = admin("office@school.edu");
        repo.create_admin(&user).await.unwrap();

        let at = Utc::now();
        repo.touch_admin_login(user.id, at).await.unwrap();

        let found = repo
            .find_admin_by_email("office@school.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.last_login_at, Some(at));
    }

    #[tokio::test]
    async fn test_post_crud() {
        let repo = setup_repo().await;
        let mut p = post("sports-day", "events", PostStatus::Draft);

        repo.create_post(&p).await.unwrap();
        assert_eq!(repo.get_post(p.id).await.unwrap().unwrap(), p);
        assert_eq!(
            repo.get_post_by_slug("sports-day").await.unwrap().unwrap().id,
            p.id
        );

        p.title = "Sports Day Results".into();
        p.set_status(PostStatus::Published, Utc::now());
        repo.update_post(&p).await.unwrap();

        let updated = repo.get_post(p.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "Sports Day Results");
        assert!(updated.is_published());
        assert!(updated.published_at.is_some());

        assert!(repo.delete_post(p.id).await.unwrap());
        assert!(!repo.delete_post(p.id).await.unwrap());
        assert!(repo.get_post(p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let repo = setup_repo().await;
        repo.create_post(&post("open-day", "events", PostStatus::Draft))
            .await
            .unwrap();

        let result = repo
            .create_post(&post("open-day", "news", PostStatus::Draft))
            .await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_missing_post_not_found() {
        let repo = setup_repo().await;

        let result = repo
            .update_post(&post("ghost", "news", PostStatus::Draft))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_posts_filters_and_orders() {
        let repo = setup_repo().await;
        let mut older = post("older", "news", PostStatus::Published);
        older.published_at = Some(Utc::now() - Duration::days(2));
        repo.create_post(&older).await.unwrap();
        repo.create_post(&post("newer", "news", PostStatus::Published))
            .await
            .unwrap();
        repo.create_post(&post("draft", "news", PostStatus::Draft))
            .await
            .unwrap();
        repo.create_post(&post("match-report", "sports", PostStatus::Published))
            .await
            .unwrap();

        let published_news = repo
            .list_posts(&PostFilter {
                category: Some("news".into()),
                status: Some(PostStatus::Published),
                ..PostFilter::default()
            })
            .await
            .unwrap();
        let slugs: Vec<_> = published_news.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);

        let first_page = repo
            .list_posts(&PostFilter {
                limit: 2,
                ..PostFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(first_page.len(), 2);

        let second_page = repo
            .list_posts(&PostFilter {
                limit: 2,
                offset: 2,
                ..PostFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(second_page.len(), 2);
    }

    #[tokio::test]
    async fn test_page_upsert_replaces() {
        let repo = setup_repo().await;
        let mut page = Page {
            slug: "about".into(),
            title: "About Us".into(),
            content: serde_json::json!({"sections": []}),
            updated_at: Utc::now(),
        };
        repo.upsert_page(&page).await.unwrap();

        page.title = "About the School".into();
        page.content = serde_json::json!({"sections": [{"heading": "History"}]});
        repo.upsert_page(&page).await.unwrap();

        let pages = repo.list_pages().await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "About the School");
        assert_eq!(pages[0].content["sections"][0]["heading"], "History");

        assert!(repo.delete_page("about").await.unwrap());
        assert!(repo.get_page("about").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_navigation_order_and_parent_detach() {
        let repo = setup_repo().await;
        let academics = nav("Academics", 2, None);
        let about = nav("About", 1, None);
        let library = nav("Library", 1, Some(academics.id));
        repo.create_nav_item(&academics).await.unwrap();
        repo.create_nav_item(&about).await.unwrap();
        repo.create_nav_item(&library).await.unwrap();

        let labels: Vec<_> = repo
            .list_nav_items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, vec!["About", "Library", "Academics"]);

        assert!(repo.delete_nav_item(academics.id).await.unwrap());
        let orphan = repo.get_nav_item(library.id).await.unwrap().unwrap();
        assert_eq!(orphan.parent_id, None);
    }

    #[tokio::test]
    async fn test_settings_and_flags() {
        let repo = setup_repo().await;
        let now = Utc::now();
        repo.upsert_setting(&SiteSetting {
            key: "site.name".into(),
            value: serde_json::json!("Hillside Secondary"),
            updated_at: now,
        })
        .await
        .unwrap();

        repo.upsert_flag(&FeatureFlag {
            key: "gallery".into(),
            enabled: true,
            description: Some("Photo gallery".into()),
            updated_at: now,
        })
        .await
        .unwrap();
        // A flag toggle without description keeps the old one.
        repo.upsert_flag(&FeatureFlag {
            key: "gallery".into(),
            enabled: false,
            description: None,
            updated_at: now,
        })
        .await
        .unwrap();

        let settings = repo.list_settings().await.unwrap();
        assert_eq!(settings[0].value, serde_json::json!("Hillside Secondary"));

        let flags = repo.list_flags().await.unwrap();
        assert_eq!(flags.len(), 1);
        assert!(!flags[0].enabled);
        assert_eq!(flags[0].description.as_deref(), Some("Photo gallery"));

        assert!(repo.delete_flag("gallery").await.unwrap());
        assert!(repo.delete_setting("site.name").await.unwrap());
        assert!(repo.list_flags().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seo_round_trip() {
        let repo = setup_repo().await;
        let seo = SeoMetadata {
            path: "/admissions".into(),
            title: "Admissions".into(),
            description: Some("How to apply".into()),
            keywords: vec!["admissions".into(), "apply".into()],
            og_image: None,
            updated_at: Utc::now(),
        };
        repo.upsert_seo(&seo).await.unwrap();

        assert_eq!(repo.get_seo("/admissions").await.unwrap().unwrap(), seo);
        assert!(repo.get_seo("/missing").await.unwrap().is_none());
        assert!(repo.delete_seo("/admissions").await.unwrap());
    }

    #[tokio::test]
    async fn test_activity_newest_first() {
        let repo = setup_repo().await;
        let user = admin("office@school.edu");
        repo.create_admin(&user).await.unwrap();

        let mut first = ActivityEntry::new(user.id, "post.create", "blog_post", None);
        first.created_at = Utc::now() - Duration::minutes(5);
        let second = ActivityEntry::new(user.id, "post.delete", "blog_post", None);
        repo.record_activity(&first).await.unwrap();
        repo.record_activity(&second).await.unwrap();

        let entries = repo.list_activity(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "post.delete");

        assert_eq!(repo.list_activity(1).await.unwrap().len(), 1);
    }
}
