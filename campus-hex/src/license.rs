//! License status polling.
//!
//! The upstream licensing service owns the status; this module keeps the last
//! answer in memory so the site can render a banner or overlay without
//! calling upstream on every request.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use campus_types::{
    LicenseError, LicenseNotice, LicenseProvider, LicenseStatus, LicenseStatusResponse,
};

/// Fetches license status from an HTTP endpoint returning the status JSON.
pub struct HttpLicenseProvider {
    url: String,
    http: reqwest::Client,
}

impl HttpLicenseProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl LicenseProvider for HttpLicenseProvider {
    async fn fetch_status(&self) -> Result<LicenseStatus, LicenseError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LicenseError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LicenseError::Unavailable(format!(
                "status endpoint returned {}",
                resp.status()
            )));
        }

        resp.json::<LicenseStatus>()
            .await
            .map_err(|e| LicenseError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    status: LicenseStatus,
    checked_at: DateTime<Utc>,
}

/// Caches the most recent license status.
pub struct LicenseMonitor {
    provider: Option<Arc<dyn LicenseProvider>>,
    latest: RwLock<Option<Snapshot>>,
}

impl LicenseMonitor {
    pub fn new(provider: Arc<dyn LicenseProvider>) -> Self {
        Self {
            provider: Some(provider),
            latest: RwLock::new(None),
        }
    }

    /// A monitor with no upstream; always reports a clear notice.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            latest: RwLock::new(None),
        }
    }

    /// Fetches a fresh status. On failure the previous status is kept.
    pub async fn refresh(&self) -> Result<(), LicenseError> {
        let Some(provider) = &self.provider else {
            return Ok(());
        };

        let status = provider.fetch_status().await?;
        let notice = status.notice();
        if notice != LicenseNotice::Clear {
            tracing::warn!(
                ?notice,
                days_remaining = status.days_remaining,
                "License attention required"
            );
        }
        *self.latest.write().await = Some(Snapshot {
            status,
            checked_at: Utc::now(),
        });
        Ok(())
    }

    /// Last known status and the notice derived from it.
    pub async fn current(&self) -> LicenseStatusResponse {
        match self.latest.read().await.as_ref() {
            Some(snapshot) => LicenseStatusResponse {
                notice: snapshot.status.notice(),
                status: Some(snapshot.status.clone()),
                checked_at: Some(snapshot.checked_at),
            },
            None => LicenseStatusResponse {
                status: None,
                notice: LicenseNotice::Clear,
                checked_at: None,
            },
        }
    }

    /// Spawns the polling task; the first poll happens immediately.
    pub fn spawn_polling(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                if let Err(e) = self.refresh().await {
                    tracing::warn!("License status check failed: {}", e);
                }
            }
        })
    }
}
