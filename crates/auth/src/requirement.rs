use serde::{Deserialize, Serialize};

/// What a caller must hold to pass an access check.
///
/// Empty lists mean "no requirement" for that dimension. `require_all`
/// selects both the quantifier inside each list (all vs any) and how the two
/// dimensions combine (AND vs OR).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequirement {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default = "crate::de::default_true")]
    pub require_all: bool,
}

impl Default for AccessRequirement {
    fn default() -> Self {
        Self {
            roles: Vec::new(),
            permissions: Vec::new(),
            require_all: true,
        }
    }
}

impl AccessRequirement {
    /// Unrestricted requirement with `require_all = true`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Any listed role/permission suffices, and either dimension suffices.
    pub fn any(mut self) -> Self {
        self.require_all = false;
        self
    }

    /// Every listed role/permission is needed, in both dimensions.
    pub fn all(mut self) -> Self {
        self.require_all = true;
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }
}

/// Access requirements attached to a route definition.
///
/// Unlike [`AccessRequirement`], absent lists stay distinguishable from empty
/// ones, and `requireAll` defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAccess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub require_all: bool,
}

impl RouteAccess {
    pub fn is_unrestricted(&self) -> bool {
        self.roles.is_none() && self.permissions.is_none()
    }

    pub fn to_requirement(&self) -> AccessRequirement {
        AccessRequirement {
            roles: self.roles.clone().unwrap_or_default(),
            permissions: self.permissions.clone().unwrap_or_default(),
            require_all: self.require_all,
        }
    }
}

impl From<AccessRequirement> for RouteAccess {
    fn from(value: AccessRequirement) -> Self {
        Self {
            roles: Some(value.roles),
            permissions: Some(value.permissions),
            require_all: value.require_all,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_require_all() {
        let req = AccessRequirement::new().roles(["admin"]);
        assert!(req.require_all);
        assert!(!req.is_unrestricted());
        assert!(!req.any().require_all);
        assert!(AccessRequirement::default().is_unrestricted());
    }

    #[test]
    fn route_data_defaults_to_any() {
        let access: RouteAccess =
            serde_json::from_str(r#"{"roles": ["admin"], "permissions": ["admin:access"]}"#)
                .unwrap();
        assert!(!access.require_all);
        assert!(!access.is_unrestricted());

        let empty: RouteAccess = serde_json::from_str("{}").unwrap();
        assert!(empty.is_unrestricted());
        assert!(empty.to_requirement().is_unrestricted());
    }

    #[test]
    fn requirement_json_defaults_to_all() {
        let req: AccessRequirement =
            serde_json::from_str(r#"{"permissions": ["reports:view"]}"#).unwrap();
        assert!(req.require_all);
        assert!(req.roles.is_empty());
    }
}
