//! Authenticated user snapshot, as delivered by the backend on login.
//!
//! The snapshot is read-only for the lifetime of a session: permission checks
//! evaluate against it directly and it is dropped on logout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labyrinth_core::{Entity, UserId};

use crate::de::{default_true, nullable_vec};
use crate::{Permission, Role};

/// The authenticated user: profile fields plus roles and direct permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,

    /// Roles granted to the user, each carrying its own permissions.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub roles: Vec<Role>,

    /// Permissions granted directly, independent of any role.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub permissions: Vec<Permission>,
}

impl AuthUser {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            email_verified: false,
            email_verified_at: None,
            first_name: None,
            last_name: None,
            display_name: None,
            avatar_url: None,
            is_active: true,
            is_deleted: false,
            last_login_at: None,
            roles: Vec::new(),
            permissions: Vec::new(),
        }
    }

    pub fn with_names(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Name shown in the console header.
    ///
    /// Falls back from "first last" to the first name, the explicit display
    /// name, the local part of the email, and finally `"User"`.
    pub fn display_label(&self) -> String {
        let first = non_blank(self.first_name.as_deref());
        let last = non_blank(self.last_name.as_deref());

        match (first, last) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            _ => non_blank(self.display_name.as_deref())
                .or_else(|| non_blank(self.email.split('@').next()))
                .unwrap_or("User")
                .to_string(),
        }
    }

    /// Avatar initials: first letters of first and last name, else the first
    /// letter of the email, else `"U"`.
    pub fn initials(&self) -> String {
        let first = non_blank(self.first_name.as_deref()).and_then(|s| s.chars().next());
        let last = non_blank(self.last_name.as_deref()).and_then(|s| s.chars().next());

        match (first, last) {
            (Some(f), Some(l)) => format!("{f}{l}").to_uppercase(),
            (Some(f), None) => f.to_uppercase().to_string(),
            _ => self
                .email
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_else(|| "U".to_string()),
        }
    }

    /// Active, not deleted.
    pub fn can_sign_in(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

impl Entity for AuthUser {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> AuthUser {
        AuthUser::new(UserId::new("usr-1"), email)
    }

    #[test]
    fn display_label_fallbacks() {
        assert_eq!(
            user("ada@example.com").with_names("Ada", "Lovelace").display_label(),
            "Ada Lovelace"
        );

        let mut first_only = user("ada@example.com");
        first_only.first_name = Some("Ada".into());
        assert_eq!(first_only.display_label(), "Ada");

        let mut explicit = user("ada@example.com");
        explicit.display_name = Some("The Countess".into());
        assert_eq!(explicit.display_label(), "The Countess");

        assert_eq!(user("ada@example.com").display_label(), "ada");
        assert_eq!(user("").display_label(), "User");
    }

    #[test]
    fn initials_fallbacks() {
        assert_eq!(user("x@example.com").with_names("ada", "lovelace").initials(), "AL");
        assert_eq!(user("ada@example.com").initials(), "A");
        assert_eq!(user("").initials(), "U");
    }

    #[test]
    fn deserializes_backend_payload() {
        let json = r#"{
            "id": "0190d6a4-7c1e-7b7a-9a51-5d0f3a2b9c11",
            "email": "root@example.com",
            "emailVerified": true,
            "emailVerifiedAt": null,
            "isActive": true,
            "isDeleted": false,
            "roles": [{"id": 1, "name": "admin", "permissions": [{"id": 10, "name": "users:manage"}]}],
            "permissions": null
        }"#;

        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.roles.len(), 1);
        assert_eq!(user.roles[0].permissions[0].name, "users:manage");
        assert!(user.permissions.is_empty());
        assert!(user.can_sign_in());
    }
}
