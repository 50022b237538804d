//! License status reported by the external licensing endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Days before the end of a pilot during which a warning is shown.
pub const PILOT_WARNING_DAYS: i64 = 7;

/// Snapshot of the deployment's license as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LicenseStatus {
    pub valid: bool,
    pub expired: bool,
    pub days_remaining: i64,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub pilot_period: bool,
}

/// What the site should display for a license status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LicenseNotice {
    /// Nothing to show.
    Clear,
    /// Dismissible banner near the end of a pilot.
    Warning {
        #[serde(rename = "daysRemaining")]
        days_remaining: i64,
    },
    /// Blocking overlay.
    Blocked,
}

impl LicenseStatus {
    pub fn notice(&self) -> LicenseNotice {
        if self.expired && !self.valid {
            return LicenseNotice::Blocked;
        }
        if self.pilot_period
            && !self.expired
            && (0..=PILOT_WARNING_DAYS).contains(&self.days_remaining)
        {
            return LicenseNotice::Warning {
                days_remaining: self.days_remaining,
            };
        }
        LicenseNotice::Clear
    }
}
