//! Audit trail of admin actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AdminUserId;

uuid_id! {
    /// Unique identifier for an activity log entry.
    ActivityId
}

/// One recorded admin action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: ActivityId,
    pub admin_user_id: AdminUserId,
    #[schema(example = "post.update")]
    pub action: String,
    #[schema(example = "blog_post")]
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(
        admin_user_id: AdminUserId,
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: Option<String>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            admin_user_id,
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id,
            created_at: Utc::now(),
        }
    }
}
