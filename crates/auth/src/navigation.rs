use serde::{Deserialize, Serialize};

use crate::{AccessRequirement, PermissionEvaluator};

/// A sidebar entry, optionally restricted by roles and/or permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub label: String,
    pub route: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    pub fn new(label: impl Into<String>, route: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            route: route.into(),
            icon: icon.into(),
            roles: None,
            permissions: None,
            children: Vec::new(),
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_children(mut self, children: Vec<NavItem>) -> Self {
        self.children = children;
        self
    }

    /// Items without restrictions are always accessible; restricted ones go
    /// through `can` with `require_all = true`.
    pub fn is_accessible(&self, evaluator: &PermissionEvaluator<'_>) -> bool {
        if self.roles.is_none() && self.permissions.is_none() {
            return true;
        }
        evaluator.can(&AccessRequirement {
            roles: self.roles.clone().unwrap_or_default(),
            permissions: self.permissions.clone().unwrap_or_default(),
            require_all: true,
        })
    }
}

/// The navigation tree with inaccessible items removed.
///
/// A hidden parent hides its whole subtree; a visible parent keeps only its
/// visible children.
pub fn visible_items(items: &[NavItem], evaluator: &PermissionEvaluator<'_>) -> Vec<NavItem> {
    items
        .iter()
        .filter(|item| item.is_accessible(evaluator))
        .map(|item| NavItem {
            children: visible_items(&item.children, evaluator),
            ..item.clone()
        })
        .collect()
}
