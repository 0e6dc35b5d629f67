//! `labyrinth-auth` — access control for the admin console.
//!
//! Role/permission evaluation, route guard decisions, navigation filtering and
//! session timing. Pure logic: no HTTP, no storage, no rendering.

pub mod authorize;
pub mod config;
mod de;
pub mod guard;
pub mod navigation;
pub mod permissions;
pub mod requirement;
pub mod roles;
pub mod session;
pub mod state;
pub mod token;
pub mod user;

pub use authorize::{AccessExplanation, AuthzError, DEFAULT_ADMIN_ROLES, PermissionEvaluator};
pub use config::{AuthConfig, AuthRoutes, ConfigError, TokenSettings, TokenStorage};
pub use guard::{GuardDecision, RoleGuard, auth_guard, guard_chain};
pub use navigation::{NavItem, visible_items};
pub use permissions::{Permission, PermissionId};
pub use requirement::{AccessRequirement, RouteAccess};
pub use roles::Role;
pub use session::{
    InactivityTracker, SessionInfo, SessionPolicy, SessionStatus, active_sessions,
    format_remaining, warning_progress,
};
pub use state::AuthState;
pub use token::{AuthResponse, RefreshTokenResponse, TokenError, TokenWindow};
pub use user::AuthUser;
