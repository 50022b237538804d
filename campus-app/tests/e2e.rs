//! End-to-end test: real server on an ephemeral port, file-backed SQLite,
//! driven through the client SDK.

use std::sync::Arc;

use campus_client::{CampusClient, ClientError};
use campus_hex::{
    CmsService, LicenseMonitor, RateLimiter, TokenIssuer,
    inbound::{Environment, HttpServer, RateLimitSettings},
};
use campus_repo::build_repo;
use campus_types::{CreatePostRequest, PostStatus, RateLimitConfig};

const PASSWORD: &str = "correct horse battery";

async fn spawn_server(dir: &tempfile::TempDir) -> String {
    let url = format!("sqlite://{}", dir.path().join("campus.db").display());
    let repo = build_repo(&url).await.unwrap();
    let service = CmsService::new(
        repo,
        TokenIssuer::new(b"e2e-secret-key-that-is-32-bytes-long!", chrono::Duration::hours(1)),
    );
    let limits = RateLimitSettings {
        api: RateLimitConfig::new(60_000, 1_000).unwrap(),
        login: RateLimitConfig::new(60_000, 10).unwrap(),
        environment: Environment::Test,
    };
    let server = HttpServer::with_components(
        service,
        Arc::new(LicenseMonitor::disabled()),
        Arc::new(RateLimiter::default()),
        limits,
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server.router()).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_admin_publishes_post_through_client() {
    let dir = tempfile::tempdir().unwrap();
    let base_url = spawn_server(&dir).await;
    let anonymous = CampusClient::new(&base_url);

    assert!(anonymous.health().await.unwrap());

    anonymous
        .bootstrap("principal@school.edu", "Principal", PASSWORD)
        .await
        .unwrap();
    let session = anonymous.login("principal@school.edu", PASSWORD).await.unwrap();
    let admin = CampusClient::new(&base_url).with_token(session.token);

    assert_eq!(admin.me().await.unwrap().email, "principal@school.edu");

    let draft = admin
        .create_post(&CreatePostRequest {
            slug: "term-dates".into(),
            title: "Term Dates".into(),
            excerpt: None,
            content: "Autumn term starts in September.".into(),
            category: "news".into(),
            author: "Office".into(),
            cover_image: None,
            tags: vec![],
            status: PostStatus::Draft,
        })
        .await
        .unwrap();

    assert!(anonymous.list_published_posts(None, None).await.unwrap().is_empty());

    let published = admin.publish_post(draft.id).await.unwrap();
    assert!(published.published_at.is_some());

    let public = anonymous.get_post("term-dates").await.unwrap();
    assert_eq!(public.id, draft.id);

    admin.set_flag("gallery", true, None).await.unwrap();
    let flags = anonymous.list_flags().await.unwrap();
    assert!(flags.iter().any(|f| f.key == "gallery" && f.enabled));
}

#[tokio::test]
async fn test_admin_calls_without_token_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = CampusClient::new(&base_url);

    let err = client.set_flag("gallery", true, None).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 401, .. }));
}
