//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Json, Router, middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use campus_types::{ContentRepository, RateLimitConfig};

use super::auth::admin_auth_middleware;
use super::client_id::Environment;
use super::handlers::{self, AppState};
use super::rate_limit::{RateLimitPolicy, RateLimitState, rate_limit_middleware};
use crate::CmsService;
use crate::license::LicenseMonitor;
use crate::limiter::RateLimiter;
use crate::openapi::ApiDoc;
use crate::token::TokenIssuer;

/// Quotas and environment used by the rate-limit middleware.
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    /// General API quota (public and admin routes).
    pub api: RateLimitConfig,
    /// Stricter quota for login and bootstrap.
    pub login: RateLimitConfig,
    pub environment: Environment,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            api: RateLimitConfig {
                window_ms: 60_000,
                max_requests: 100,
            },
            login: RateLimitConfig {
                window_ms: 15 * 60_000,
                max_requests: 5,
            },
            environment: Environment::Development,
        }
    }
}

/// HTTP Server for the campus CMS API.
pub struct HttpServer<R: ContentRepository> {
    state: Arc<AppState<R>>,
    tokens: Arc<TokenIssuer>,
    limiter: Arc<RateLimiter>,
    limits: RateLimitSettings,
}

impl<R: ContentRepository> HttpServer<R> {
    /// Creates a server with default quotas, a fresh in-memory limiter and
    /// no license upstream.
    pub fn new(service: CmsService<R>) -> Self {
        Self::with_components(
            service,
            Arc::new(LicenseMonitor::disabled()),
            Arc::new(RateLimiter::default()),
            RateLimitSettings::default(),
        )
    }

    /// Creates a server around shared, externally managed components.
    pub fn with_components(
        service: CmsService<R>,
        license: Arc<LicenseMonitor>,
        limiter: Arc<RateLimiter>,
        limits: RateLimitSettings,
    ) -> Self {
        let tokens = Arc::new(service.tokens().clone());
        Self {
            state: Arc::new(AppState { service, license }),
            tokens,
            limiter,
            limits,
        }
    }

    fn rate_limit(&self, scope: &'static str, config: RateLimitConfig) -> RateLimitState {
        RateLimitState {
            limiter: self.limiter.clone(),
            policy: RateLimitPolicy::new(scope, config),
            environment: self.limits.environment,
        }
    }

    /// Builds the Axum router with all routes.
    ///
    /// Admin routes check the token first, then the rate limit. Public routes
    /// only check the rate limit. `/health` and the API document skip both.
    pub fn router(&self) -> Router {
        let api_limit = self.rate_limit("api", self.limits.api);
        let login_limit = self.rate_limit("login", self.limits.login);

        let public = Router::new()
            .route("/api/posts", get(handlers::list_published_posts::<R>))
            .route("/api/posts/{slug}", get(handlers::get_published_post::<R>))
            .route("/api/pages/{slug}", get(handlers::get_page::<R>))
            .route("/api/navigation", get(handlers::public_navigation::<R>))
            .route("/api/settings", get(handlers::list_settings::<R>))
            .route("/api/features", get(handlers::list_flags::<R>))
            .route("/api/seo", get(handlers::get_seo::<R>))
            .route("/api/license/status", get(handlers::license_status::<R>))
            .layer(middleware::from_fn_with_state(
                api_limit.clone(),
                rate_limit_middleware,
            ));

        let auth = Router::new()
            .route("/api/auth/login", post(handlers::login::<R>))
            .route("/api/auth/bootstrap", post(handlers::bootstrap::<R>))
            .layer(middleware::from_fn_with_state(
                login_limit,
                rate_limit_middleware,
            ));

        let admin = Router::new()
            .route("/api/auth/me", get(handlers::me))
            .route(
                "/api/admin/users",
                get(handlers::list_admins::<R>).post(handlers::create_admin::<R>),
            )
            .route(
                "/api/admin/posts",
                get(handlers::list_posts::<R>).post(handlers::create_post::<R>),
            )
            .route(
                "/api/admin/posts/{id}",
                get(handlers::get_post::<R>)
                    .put(handlers::update_post::<R>)
                    .delete(handlers::delete_post::<R>),
            )
            .route("/api/admin/pages", get(handlers::list_pages::<R>))
            .route(
                "/api/admin/pages/{slug}",
                put(handlers::upsert_page::<R>).delete(handlers::delete_page::<R>),
            )
            .route(
                "/api/admin/navigation",
                get(handlers::list_navigation::<R>).post(handlers::create_nav_item::<R>),
            )
            .route(
                "/api/admin/navigation/{id}",
                put(handlers::update_nav_item::<R>).delete(handlers::delete_nav_item::<R>),
            )
            .route(
                "/api/admin/settings/{key}",
                put(handlers::upsert_setting::<R>).delete(handlers::delete_setting::<R>),
            )
            .route(
                "/api/admin/features/{key}",
                put(handlers::set_flag::<R>).delete(handlers::delete_flag::<R>),
            )
            .route(
                "/api/admin/seo",
                get(handlers::list_seo::<R>)
                    .put(handlers::upsert_seo::<R>)
                    .delete(handlers::delete_seo::<R>),
            )
            .route("/api/admin/activity", get(handlers::list_activity::<R>))
            .layer(middleware::from_fn_with_state(
                api_limit,
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                self.tokens.clone(),
                admin_auth_middleware,
            ));

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api-docs/openapi.json",
                get(|| async { Json(ApiDoc::openapi()) }),
            )
            .merge(public)
            .merge(auth)
            .merge(admin)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
