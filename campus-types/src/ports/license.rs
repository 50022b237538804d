//! License status provider port.

use crate::domain::LicenseStatus;
use crate::error::LicenseError;

/// Source of the deployment's license status (usually a remote HTTP endpoint).
#[async_trait::async_trait]
pub trait LicenseProvider: Send + Sync {
    async fn fetch_status(&self) -> Result<LicenseStatus, LicenseError>;
}
