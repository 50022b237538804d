//! # Campus Client SDK
//!
//! A typed Rust client for the campus CMS API. Responses are unwrapped from
//! the `{"success": ..., "data": ...}` envelope.

use campus_types::{
    AdminIdentity, AdminProfile, BlogPost, BootstrapRequest, CreatePostRequest, FeatureFlag,
    LicenseStatusResponse, LoginRequest, LoginResponse, PostId, PostStatus,
    SetFeatureFlagRequest, SiteSetting, UpdatePostRequest, UpsertSettingRequest,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response envelope carried no data")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
    #[serde(default)]
    message: Option<String>,
}

/// Campus CMS API client.
pub struct CampusClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl CampusClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: Client::new(),
        }
    }

    /// Sets the bearer token for admin endpoints.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates the first super admin on an empty installation.
    pub async fn bootstrap(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<AdminProfile, ClientError> {
        let req = BootstrapRequest {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        };
        self.send(self.http.post(self.url("/api/auth/bootstrap")).json(&req))
            .await
    }

    /// Logs in. Use [`CampusClient::with_token`] with the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.http.post(self.url("/api/auth/login")).json(&req))
            .await
    }

    pub async fn me(&self) -> Result<AdminIdentity, ClientError> {
        self.send(self.authed(self.http.get(self.url("/api/auth/me"))))
            .await
    }

    pub async fn license_status(&self) -> Result<LicenseStatusResponse, ClientError> {
        self.send(self.http.get(self.url("/api/license/status")))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Posts
    // ─────────────────────────────────────────────────────────────────────────

    /// Lists published posts.
    pub async fn list_published_posts(
        &self,
        category: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<BlogPost>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.send(self.http.get(self.url("/api/posts")).query(&query))
            .await
    }

    /// Lists every post, drafts included (admin).
    pub async fn list_posts(
        &self,
        status: Option<PostStatus>,
    ) -> Result<Vec<BlogPost>, ClientError> {
        let mut req = self.http.get(self.url("/api/admin/posts"));
        if let Some(status) = status {
            req = req.query(&[("status", status.to_string())]);
        }
        self.send(self.authed(req)).await
    }

    /// Gets a published post by slug.
    pub async fn get_post(&self, slug: &str) -> Result<BlogPost, ClientError> {
        self.send(self.http.get(self.url(&format!("/api/posts/{}", slug))))
            .await
    }

    pub async fn create_post(&self, req: &CreatePostRequest) -> Result<BlogPost, ClientError> {
        self.send(self.authed(self.http.post(self.url("/api/admin/posts")).json(req)))
            .await
    }

    pub async fn update_post(
        &self,
        id: PostId,
        req: &UpdatePostRequest,
    ) -> Result<BlogPost, ClientError> {
        self.send(self.authed(
            self.http
                .put(self.url(&format!("/api/admin/posts/{}", id)))
                .json(req),
        ))
        .await
    }

    /// Publishes a draft.
    pub async fn publish_post(&self, id: PostId) -> Result<BlogPost, ClientError> {
        let req = UpdatePostRequest {
            status: Some(PostStatus::Published),
            ..Default::default()
        };
        self.update_post(id, &req).await
    }

    pub async fn delete_post(&self, id: PostId) -> Result<(), ClientError> {
        self.send_unit(self.authed(
            self.http
                .delete(self.url(&format!("/api/admin/posts/{}", id))),
        ))
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Feature flags & settings
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_flags(&self) -> Result<Vec<FeatureFlag>, ClientError> {
        self.send(self.http.get(self.url("/api/features"))).await
    }

    pub async fn set_flag(
        &self,
        key: &str,
        enabled: bool,
        description: Option<String>,
    ) -> Result<FeatureFlag, ClientError> {
        let req = SetFeatureFlagRequest {
            enabled,
            description,
        };
        self.send(self.authed(
            self.http
                .put(self.url(&format!("/api/admin/features/{}", key)))
                .json(&req),
        ))
        .await
    }

    pub async fn list_settings(&self) -> Result<Vec<SiteSetting>, ClientError> {
        self.send(self.http.get(self.url("/api/settings"))).await
    }

    pub async fn set_setting(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<SiteSetting, ClientError> {
        let req = UpsertSettingRequest { value };
        self.send(self.authed(
            self.http
                .put(self.url(&format!("/api/admin/settings/{}", key)))
                .json(&req),
        ))
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Plumbing
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let body = self.checked_body(req).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        envelope.data.ok_or(ClientError::EmptyResponse)
    }

    async fn send_unit(&self, req: RequestBuilder) -> Result<(), ClientError> {
        self.checked_body(req).await.map(|_| ())
    }

    async fn checked_body(&self, req: RequestBuilder) -> Result<String, ClientError> {
        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ClientError::RateLimited { retry_after_secs });
        }

        let body = resp.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error,
            message: Some(message),
        }) => format!("{}: {}", error, message),
        Ok(ErrorEnvelope { error, .. }) => error,
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CampusClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = CampusClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_token() {
        let client = CampusClient::new("http://localhost:3000").with_token("abc.def.ghi");
        assert_eq!(client.token, Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_error_message_from_envelope() {
        assert_eq!(
            error_message(r#"{"success":false,"error":"Not found","message":"Post x"}"#),
            "Not found: Post x"
        );
        assert_eq!(
            error_message(r#"{"success":false,"error":"Internal server error"}"#),
            "Internal server error"
        );
        assert_eq!(error_message("bad gateway"), "bad gateway");
    }
}
