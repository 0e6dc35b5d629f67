use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AuthUser;

/// Login/registration/OAuth response from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,

    /// Absent when the backend keeps the refresh token in an httpOnly cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub user: AuthUser,

    /// Access token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Response of the token refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("access token is missing")]
    MissingAccessToken,

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Validity window of an access token.
///
/// `expires_at` is `None` when the backend did not report a lifetime; such a
/// token never expires client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenWindow {
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenWindow {
    pub fn new(issued_at: DateTime<Utc>, expires_in: Option<u64>) -> Self {
        let expires_at = expires_in.map(|secs| {
            let secs = i64::try_from(secs).unwrap_or(i64::MAX);
            Duration::try_seconds(secs)
                .and_then(|d| issued_at.checked_add_signed(d))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        });
        Self {
            issued_at,
            expires_at,
        }
    }

    /// Deterministically validate the window against `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        if let Some(expires_at) = self.expires_at {
            if expires_at <= self.issued_at {
                return Err(TokenError::InvalidTimeWindow);
            }
        }
        if now < self.issued_at {
            return Err(TokenError::NotYetValid);
        }
        if let Some(expires_at) = self.expires_at {
            if now >= expires_at {
                return Err(TokenError::Expired);
            }
        }
        Ok(())
    }

    /// Time left before expiry, clamped at zero. `None` without an expiry.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|expires_at| (expires_at - now).max(Duration::zero()))
    }

    /// True once `now` is within `before_expiry` of the expiry.
    pub fn needs_refresh(&self, now: DateTime<Utc>, before_expiry: Duration) -> bool {
        self.remaining(now)
            .is_some_and(|remaining| remaining <= before_expiry)
    }
}
