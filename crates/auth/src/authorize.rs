use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::{AccessRequirement, AuthUser, Permission};

/// Roles treated as administrators unless the config says otherwise.
pub const DEFAULT_ADMIN_ROLES: &[&str] = &["admin", "administrator", "superadmin"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("forbidden: missing roles {missing_roles:?}, missing permissions {missing_permissions:?}")]
    Forbidden {
        missing_roles: Vec<String>,
        missing_permissions: Vec<String>,
    },
}

/// Role/permission checks over a snapshot of the current user.
///
/// - No IO
/// - No panics
/// - No caching: the effective permission set is derived from the snapshot
///   on every check.
///
/// An evaluator without a user is anonymous: it holds no roles and no
/// permissions, so only unrestricted requirements pass.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    user: Option<&'a AuthUser>,
    admin_roles: Option<&'a [String]>,
}

impl<'a> PermissionEvaluator<'a> {
    pub fn new(user: Option<&'a AuthUser>) -> Self {
        Self {
            user,
            admin_roles: None,
        }
    }

    pub fn for_user(user: &'a AuthUser) -> Self {
        Self::new(Some(user))
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// Override the role names that [`is_admin`](Self::is_admin) accepts.
    pub fn with_admin_roles(mut self, roles: &'a [String]) -> Self {
        self.admin_roles = Some(roles);
        self
    }

    pub fn user(&self) -> Option<&'a AuthUser> {
        self.user
    }

    /// Role names in grant order.
    pub fn role_names(&self) -> Vec<&'a str> {
        self.user
            .map(|u| u.roles.iter().map(|r| r.as_str()).collect())
            .unwrap_or_default()
    }

    /// Direct permissions followed by role permissions (in role order),
    /// deduplicated by name. The first occurrence of a name wins.
    pub fn effective_permissions(&self) -> Vec<&'a Permission> {
        let Some(user) = self.user else {
            return Vec::new();
        };

        let mut seen: HashSet<&str> = HashSet::new();
        user.permissions
            .iter()
            .chain(user.roles.iter().flat_map(|r| r.permissions.iter()))
            .filter(|p| seen.insert(p.as_str()))
            .collect()
    }

    pub fn permission_names(&self) -> Vec<&'a str> {
        self.effective_permissions()
            .into_iter()
            .map(|p| p.as_str())
            .collect()
    }

    fn role_set(&self) -> HashSet<&'a str> {
        self.role_names().into_iter().collect()
    }

    fn permission_set(&self) -> HashSet<&'a str> {
        self.permission_names().into_iter().collect()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role_set().contains(role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        let held = self.role_set();
        roles.iter().any(|r| held.contains(r.as_ref()))
    }

    pub fn has_all_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        let held = self.role_set();
        roles.iter().all(|r| held.contains(r.as_ref()))
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permission_set().contains(permission)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        let held = self.permission_set();
        permissions.iter().any(|p| held.contains(p.as_ref()))
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        let held = self.permission_set();
        permissions.iter().all(|p| held.contains(p.as_ref()))
    }

    /// True if any effective permission is scoped to exactly this
    /// resource/action pair.
    pub fn has_resource_permission(&self, resource: &str, action: &str) -> bool {
        self.effective_permissions()
            .iter()
            .any(|p| p.matches(resource, action))
    }

    /// Combined role and permission check.
    ///
    /// - Both lists empty: allowed.
    /// - Each dimension passes when its list is empty, otherwise by all/any
    ///   according to `require_all`.
    /// - `require_all` joins the dimensions with AND, otherwise with OR.
    ///
    /// With `require_all = false` an empty dimension counts as passed, so a
    /// requirement naming only roles (or only permissions) always passes.
    pub fn can(&self, requirement: &AccessRequirement) -> bool {
        if requirement.is_unrestricted() {
            return true;
        }

        let require_all = requirement.require_all;

        let roles_ok = requirement.roles.is_empty()
            || if require_all {
                self.has_all_roles(&requirement.roles)
            } else {
                self.has_any_role(&requirement.roles)
            };

        let permissions_ok = requirement.permissions.is_empty()
            || if require_all {
                self.has_all_permissions(&requirement.permissions)
            } else {
                self.has_any_permission(&requirement.permissions)
            };

        if require_all {
            roles_ok && permissions_ok
        } else {
            roles_ok || permissions_ok
        }
    }

    pub fn cannot(&self, requirement: &AccessRequirement) -> bool {
        !self.can(requirement)
    }

    /// Route-guard entry point: absent requirements allow access, anything
    /// else goes through [`can`](Self::can).
    pub fn can_activate_route<S: AsRef<str>>(
        &self,
        roles: Option<&[S]>,
        permissions: Option<&[S]>,
        require_all: bool,
    ) -> bool {
        if roles.is_none() && permissions.is_none() {
            return true;
        }

        let to_owned = |names: Option<&[S]>| -> Vec<String> {
            names
                .unwrap_or_default()
                .iter()
                .map(|n| n.as_ref().to_string())
                .collect()
        };

        self.can(&AccessRequirement {
            roles: to_owned(roles),
            permissions: to_owned(permissions),
            require_all,
        })
    }

    pub fn is_admin(&self) -> bool {
        match self.admin_roles {
            Some(roles) => self.has_any_role(roles),
            None => self.has_any_role(DEFAULT_ADMIN_ROLES),
        }
    }

    /// `Result` flavour of [`can`](Self::can) for callers that propagate with `?`.
    pub fn authorize(&self, requirement: &AccessRequirement) -> Result<(), AuthzError> {
        if self.can(requirement) {
            return Ok(());
        }
        if self.user.is_none() {
            return Err(AuthzError::Unauthenticated);
        }

        let explanation = self.explain(requirement);
        Err(AuthzError::Forbidden {
            missing_roles: explanation.missing_roles,
            missing_permissions: explanation.missing_permissions,
        })
    }

    /// Explain a decision: what the user holds and what the requirement
    /// names that the user lacks.
    pub fn explain(&self, requirement: &AccessRequirement) -> AccessExplanation {
        let held_roles = self.role_set();
        let held_permissions = self.permission_set();

        let missing_roles = requirement
            .roles
            .iter()
            .filter(|r| !held_roles.contains(r.as_str()))
            .cloned()
            .collect();
        let missing_permissions = requirement
            .permissions
            .iter()
            .filter(|p| !held_permissions.contains(p.as_str()))
            .cloned()
            .collect();

        let mut effective_permissions: Vec<String> =
            self.permission_names().into_iter().map(str::to_string).collect();
        effective_permissions.sort();

        AccessExplanation {
            granted: self.can(requirement),
            authenticated: self.user.is_some(),
            required: requirement.clone(),
            roles: self.role_names().into_iter().map(str::to_string).collect(),
            effective_permissions,
            missing_roles,
            missing_permissions,
        }
    }
}

/// Auditable breakdown of an access decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessExplanation {
    pub granted: bool,
    pub authenticated: bool,
    pub required: AccessRequirement,
    pub roles: Vec<String>,
    /// Sorted for readability.
    pub effective_permissions: Vec<String>,
    pub missing_roles: Vec<String>,
    pub missing_permissions: Vec<String>,
}
