//! Admin user domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

uuid_id! {
    /// Unique identifier for an admin user.
    AdminUserId
}

/// Back-office role carried in the signed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    Editor,
}

impl AdminRole {
    /// Whether this role may manage other admin accounts.
    pub fn can_manage_admins(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::Admin => "admin",
            AdminRole::Editor => "editor",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AdminRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(AdminRole::SuperAdmin),
            "admin" => Ok(AdminRole::Admin),
            "editor" => Ok(AdminRole::Editor),
            other => Err(DomainError::ValidationError(format!(
                "Unknown admin role: {}",
                other
            ))),
        }
    }
}

/// The identity embedded in an admin token's claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminIdentity {
    pub user_id: AdminUserId,
    pub email: String,
    pub role: AdminRole,
}

/// A back-office account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: String,
    pub name: String,
    /// PHC-formatted password hash, never serialized to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl AdminUser {
    /// Creates a new active admin.
    ///
    /// The email is normalised to lowercase; the name may not be blank.
    pub fn new(
        email: &str,
        name: String,
        password_hash: String,
        role: AdminRole,
    ) -> Result<Self, DomainError> {
        let email = normalize_email(email)?;
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Admin name cannot be empty".into(),
            ));
        }

        Ok(Self {
            id: AdminUserId::new(),
            email,
            name,
            password_hash,
            role,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        })
    }

    /// The identity to embed in a token issued for this admin.
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            user_id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Lowercases and sanity-checks an email address.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid || email.len() > 254 {
        return Err(DomainError::ValidationError("Invalid email address".into()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Head@School.EDU ").unwrap(),
            "head@school.edu"
        );
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@school.edu").is_err());
        assert!(normalize_email("head@localhost").is_err());
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin, AdminRole::Editor] {
            assert_eq!(role.to_string().parse::<AdminRole>().unwrap(), role);
        }
        assert!("janitor".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_admin_identity_matches_user() {
        let user = AdminUser::new(
            "Office@school.edu",
            "Office".into(),
            "hash".into(),
            AdminRole::Editor,
        )
        .unwrap();
        let identity = user.identity();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.email, "office@school.edu");
        assert_eq!(identity.role, AdminRole::Editor);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user =
            AdminUser::new("a@b.org", "A".into(), "secret-hash".into(), AdminRole::Admin).unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
