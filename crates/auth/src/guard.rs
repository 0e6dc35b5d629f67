//! Route guard decisions.
//!
//! Guards only decide; performing the navigation is up to the router.

use serde::{Deserialize, Serialize};

use crate::{AccessRequirement, AuthConfig, AuthState, PermissionEvaluator, RouteAccess};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "decision", content = "to")]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Requires a signed-in user; otherwise redirects to the login route.
pub fn auth_guard(state: &AuthState, config: &AuthConfig) -> GuardDecision {
    if state.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(config.routes.login.clone())
    }
}

/// Role/permission guard for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    access: RouteAccess,
}

impl RoleGuard {
    /// Guard built in code; `require_all` defaults to `true` here.
    pub fn new(roles: Option<Vec<String>>, permissions: Option<Vec<String>>) -> Self {
        Self {
            access: RouteAccess {
                roles,
                permissions,
                require_all: true,
            },
        }
    }

    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Some(roles.into_iter().map(Into::into).collect()), None)
    }

    pub fn permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(None, Some(permissions.into_iter().map(Into::into).collect()))
    }

    pub fn require_any(mut self) -> Self {
        self.access.require_all = false;
        self
    }

    /// Guard driven by route data, where `requireAll` defaults to `false`.
    pub fn from_route_data(access: RouteAccess) -> Self {
        Self { access }
    }

    pub fn from_requirement(requirement: AccessRequirement) -> Self {
        Self {
            access: requirement.into(),
        }
    }

    pub fn access(&self) -> &RouteAccess {
        &self.access
    }

    pub fn check(&self, url: &str, evaluator: &PermissionEvaluator<'_>, config: &AuthConfig) -> GuardDecision {
        let granted = evaluator.can_activate_route(
            self.access.roles.as_deref(),
            self.access.permissions.as_deref(),
            self.access.require_all,
        );

        tracing::debug!(
            url,
            required_roles = ?self.access.roles,
            required_permissions = ?self.access.permissions,
            require_all = self.access.require_all,
            user_roles = ?evaluator.role_names(),
            granted,
            "role guard"
        );

        if granted {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(config.routes.unauthorized.clone())
        }
    }
}

/// Authentication first, then each role guard in order. First redirect wins.
pub fn guard_chain(url: &str, state: &AuthState, guards: &[RoleGuard], config: &AuthConfig) -> GuardDecision {
    let decision = auth_guard(state, config);
    if !decision.is_allowed() {
        tracing::debug!(url, "route requires authentication");
        return decision;
    }

    let evaluator = state.evaluator();
    guards
        .iter()
        .map(|guard| guard.check(url, &evaluator, config))
        .find(|decision| !decision.is_allowed())
        .unwrap_or(GuardDecision::Allow)
}
