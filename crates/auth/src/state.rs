//! In-memory auth state of the console: created on login, discarded on logout.

use chrono::{DateTime, Utc};

use crate::{
    AuthConfig, AuthResponse, AuthUser, InactivityTracker, PermissionEvaluator,
    RefreshTokenResponse, SessionStatus, TokenError, TokenWindow,
};

#[derive(Debug, Clone)]
struct ActiveSession {
    user: AuthUser,
    access_token: String,
    refresh_token: Option<String>,
    window: TokenWindow,
    activity: InactivityTracker,
}

/// Current authentication state.
///
/// Holds at most one signed-in user. Nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    session: Option<ActiveSession>,
    error: Option<String>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the session described by a login response.
    ///
    /// On failure the previous state is kept and the error message recorded.
    pub fn login(&mut self, response: AuthResponse, now: DateTime<Utc>) -> Result<&AuthUser, TokenError> {
        if let Err(err) = Self::check_token(&response.access_token, response.expires_in, now) {
            tracing::warn!(user_id = %response.user.id, error = %err, "login rejected");
            self.error = Some(err.to_string());
            return Err(err);
        }

        tracing::info!(user_id = %response.user.id, roles = response.user.roles.len(), "user signed in");

        self.error = None;
        let session = self.session.insert(ActiveSession {
            window: TokenWindow::new(now, response.expires_in),
            activity: InactivityTracker::new(now),
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: response.user,
        });
        Ok(&session.user)
    }

    fn check_token(access_token: &str, expires_in: Option<u64>, now: DateTime<Utc>) -> Result<(), TokenError> {
        if access_token.trim().is_empty() {
            return Err(TokenError::MissingAccessToken);
        }
        TokenWindow::new(now, expires_in).validate(now)
    }

    /// Drop the session. Returns the user that was signed in, if any.
    pub fn logout(&mut self) -> Option<AuthUser> {
        let session = self.session.take()?;
        tracing::info!(user_id = %session.user.id, "user signed out");
        Some(session.user)
    }

    /// Swap in a refreshed access token. Requires a signed-in user.
    ///
    /// Failures are recorded like a rejected login; the session is kept.
    pub fn refresh(&mut self, response: RefreshTokenResponse, now: DateTime<Utc>) -> Result<(), TokenError> {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!("token refresh without a session");
            self.error = Some(TokenError::NotSignedIn.to_string());
            return Err(TokenError::NotSignedIn);
        };
        if let Err(err) = Self::check_token(&response.access_token, response.expires_in, now) {
            tracing::warn!(user_id = %session.user.id, error = %err, "token refresh rejected");
            self.error = Some(err.to_string());
            return Err(err);
        }

        session.access_token = response.access_token;
        session.window = TokenWindow::new(now, response.expires_in);
        tracing::debug!(user_id = %session.user.id, "access token refreshed");
        self.error = None;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.refresh_token.as_deref())
    }

    pub fn token_window(&self) -> Option<TokenWindow> {
        self.session.as_ref().map(|s| s.window)
    }

    /// Evaluator over the current user (anonymous when signed out).
    pub fn evaluator(&self) -> PermissionEvaluator<'_> {
        PermissionEvaluator::new(self.user())
    }

    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        if let Some(session) = self.session.as_mut() {
            session.activity.record_activity(now);
        }
    }

    /// `None` when signed out.
    pub fn session_status(&self, now: DateTime<Utc>, config: &AuthConfig) -> Option<SessionStatus> {
        self.session
            .as_ref()
            .map(|s| s.activity.status(now, &config.session))
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>, config: &AuthConfig) -> bool {
        self.session.as_ref().is_some_and(|s| {
            s.window
                .needs_refresh(now, config.session.refresh_before_expiry())
        })
    }

    /// Sign out when the inactivity timeout or the token expiry has passed.
    /// Returns true if a session was ended.
    pub fn expire_if_idle(&mut self, now: DateTime<Utc>, config: &AuthConfig) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };

        let timed_out = session.activity.status(now, &config.session) == SessionStatus::TimedOut;
        let expired = session.window.validate(now) == Err(TokenError::Expired);
        if !(timed_out || expired) {
            return false;
        }

        tracing::info!(user_id = %session.user.id, timed_out, expired, "session ended");
        self.session = None;
        true
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessRequirement, Role};
    use chrono::{Duration, TimeZone};
    use labyrinth_core::UserId;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0).unwrap()
    }

    fn response(token: &str, expires_in: Option<u64>) -> AuthResponse {
        AuthResponse {
            access_token: token.to_string(),
            refresh_token: None,
            user: AuthUser::new(UserId::new("usr-1"), "admin@example.com").with_role(Role::new(1, "admin")),
            expires_in,
        }
    }

    #[test]
    fn login_then_logout() {
        let mut state = AuthState::new();
        assert!(!state.is_authenticated());

        let user = state.login(response("tok", Some(900)), t0()).unwrap();
        assert_eq!(user.email, "admin@example.com");
        assert!(state.is_authenticated());
        assert_eq!(state.access_token(), Some("tok"));
        assert!(state.evaluator().has_role("admin"));

        let user = state.logout().unwrap();
        assert_eq!(user.email, "admin@example.com");
        assert!(!state.is_authenticated());
        assert!(!state.evaluator().can(&AccessRequirement::new().roles(["admin"])));
        assert!(state.logout().is_none());
    }

    #[test]
    fn rejected_login_records_error_and_keeps_state() {
        let mut state = AuthState::new();
        let err = state.login(response("  ", Some(900)), t0()).unwrap_err();
        assert_eq!(err, TokenError::MissingAccessToken);
        assert!(!state.is_authenticated());
        assert_eq!(state.error(), Some("access token is missing"));

        state.login(response("tok", None), t0()).unwrap();
        assert!(state.error().is_none());
    }

    #[test]
    fn idle_sessions_are_ended() {
        let config = AuthConfig::default();
        let mut state = AuthState::new();
        state.login(response("tok", None), t0()).unwrap();

        state.record_activity(t0() + Duration::minutes(20));
        assert_eq!(
            state.session_status(t0() + Duration::minutes(46), &config),
            Some(SessionStatus::Warning {
                remaining: Duration::minutes(4)
            })
        );
        assert!(!state.expire_if_idle(t0() + Duration::minutes(46), &config));
        assert!(state.expire_if_idle(t0() + Duration::minutes(50), &config));
        assert!(!state.is_authenticated());
        assert_eq!(state.session_status(t0(), &config), None);
    }

    #[test]
    fn refresh_replaces_the_token_window() {
        let config = AuthConfig::default();
        let mut state = AuthState::new();
        state.login(response("old", Some(600)), t0()).unwrap();

        let later = t0() + Duration::minutes(9);
        assert!(state.needs_refresh(later, &config));

        state
            .refresh(
                RefreshTokenResponse {
                    access_token: "new".into(),
                    expires_in: Some(600),
                },
                later,
            )
            .unwrap();
        assert_eq!(state.access_token(), Some("new"));
        assert!(!state.needs_refresh(later, &config));
    }

    #[test]
    fn refresh_requires_a_session_and_records_failures() {
        let refreshed = |token: &str| RefreshTokenResponse {
            access_token: token.into(),
            expires_in: Some(600),
        };

        let mut signed_out = AuthState::new();
        assert_eq!(signed_out.refresh(refreshed("valid"), t0()), Err(TokenError::NotSignedIn));
        assert_eq!(signed_out.error(), Some("no user is signed in"));

        let mut state = AuthState::new();
        state.login(response("old", Some(600)), t0()).unwrap();
        assert_eq!(state.refresh(refreshed(" "), t0()), Err(TokenError::MissingAccessToken));
        assert_eq!(state.error(), Some("access token is missing"));
        assert_eq!(state.access_token(), Some("old"));

        state.refresh(refreshed("new"), t0()).unwrap();
        assert!(state.error().is_none());
        assert_eq!(state.access_token(), Some("new"));
    }

    #[test]
    fn refresh_token_is_kept_from_login() {
        let mut state = AuthState::new();
        assert_eq!(state.refresh_token(), None);

        let mut login = response("tok", Some(900));
        login.refresh_token = Some("rt-1".into());
        state.login(login, t0()).unwrap();
        assert_eq!(state.refresh_token(), Some("rt-1"));

        state.logout();
        assert_eq!(state.refresh_token(), None);
    }

    #[test]
    fn reported_errors_can_be_cleared() {
        let mut state = AuthState::new();
        state.fail("invalid credentials");
        assert_eq!(state.error(), Some("invalid credentials"));

        state.clear_error();
        assert!(state.error().is_none());
    }
}
