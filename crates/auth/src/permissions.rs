use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// The backend numbers some permissions and names others, so both shapes are
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionId {
    Numeric(u64),
    Text(String),
}

impl core::fmt::Display for PermissionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PermissionId::Numeric(n) => write!(f, "{n}"),
            PermissionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PermissionId {
    fn from(value: u64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for PermissionId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A named capability, optionally scoped to a resource/action pair
/// (e.g. `users:create` on resource `users`, action `create`).
///
/// Identity for access checks is the `name`; two permissions with the same name
/// are the same capability even if their ids differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Permission {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self::with_id(PermissionId::Numeric(id), name)
    }

    pub fn with_id(id: PermissionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            resource: None,
            action: None,
            description: None,
        }
    }

    pub fn with_scope(mut self, resource: impl Into<String>, action: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self.action = Some(action.into());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// True only when both resource and action are set and equal the arguments.
    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource.as_deref() == Some(resource) && self.action.as_deref() == Some(action)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_accepts_numbers_and_strings() {
        let p: Permission = serde_json::from_str(r#"{"id": 3, "name": "users:read"}"#).unwrap();
        assert_eq!(p.id, PermissionId::Numeric(3));

        let p: Permission =
            serde_json::from_str(r#"{"id": "perm-9", "name": "users:read"}"#).unwrap();
        assert_eq!(p.id, PermissionId::Text("perm-9".into()));
        assert_eq!(p.id.to_string(), "perm-9");
    }

    #[test]
    fn scope_match_requires_both_parts() {
        let scoped = Permission::new(1, "users:create").with_scope("users", "create");
        assert!(scoped.matches("users", "create"));
        assert!(!scoped.matches("users", "delete"));

        let unscoped = Permission::new(2, "users:create");
        assert!(!unscoped.matches("users", "create"));
    }
}
