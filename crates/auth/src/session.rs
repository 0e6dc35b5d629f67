//! Session timing: inactivity timeout, expiry warning, and the device
//! session listing shown on the sessions page.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use labyrinth_core::{Entity, SessionId, UserId};

/// Session timing policy. Durations are milliseconds on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionPolicy {
    pub inactivity_timeout_ms: u64,
    pub refresh_before_expiry_ms: u64,
    pub warning_threshold_ms: u64,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            inactivity_timeout_ms: 30 * 60 * 1000,
            refresh_before_expiry_ms: 2 * 60 * 1000,
            warning_threshold_ms: 5 * 60 * 1000,
        }
    }
}

impl SessionPolicy {
    pub fn inactivity_timeout(&self) -> Duration {
        millis(self.inactivity_timeout_ms)
    }

    pub fn refresh_before_expiry(&self) -> Duration {
        millis(self.refresh_before_expiry_ms)
    }

    pub fn warning_threshold(&self) -> Duration {
        millis(self.warning_threshold_ms)
    }
}

fn millis(ms: u64) -> Duration {
    Duration::try_milliseconds(i64::try_from(ms).unwrap_or(i64::MAX)).unwrap_or(Duration::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    /// Inside the warning window; the user can still extend the session.
    Warning { remaining: Duration },
    TimedOut,
}

/// Tracks the last user activity of a signed-in session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InactivityTracker {
    last_activity: DateTime<Utc>,
}

impl InactivityTracker {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { last_activity: now }
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Activity never moves the clock backwards.
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    /// Time until the inactivity timeout, clamped at zero.
    pub fn remaining(&self, now: DateTime<Utc>, policy: &SessionPolicy) -> Duration {
        let deadline = self
            .last_activity
            .checked_add_signed(policy.inactivity_timeout())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        (deadline - now).max(Duration::zero())
    }

    pub fn status(&self, now: DateTime<Utc>, policy: &SessionPolicy) -> SessionStatus {
        let remaining = self.remaining(now, policy);
        if remaining <= Duration::zero() {
            SessionStatus::TimedOut
        } else if remaining <= policy.warning_threshold() {
            SessionStatus::Warning { remaining }
        } else {
            SessionStatus::Active
        }
    }
}

/// `M:SS`, negative durations shown as `0:00`.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{}:{:02}", total / 60, total % 60)
}

/// Percentage of the warning window still left, 0–100.
pub fn warning_progress(remaining: Duration, policy: &SessionPolicy) -> f64 {
    let window = policy.warning_threshold().num_seconds();
    if window <= 0 {
        return 0.0;
    }
    let left = remaining.num_seconds().clamp(0, window);
    left as f64 / window as f64 * 100.0
}

/// One signed-in device, as listed by the sessions endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: SessionId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub is_revoked: bool,
}

impl SessionInfo {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && now < self.expires_at
    }

    /// Last use, or creation time if the session was never used.
    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_used_at.unwrap_or(self.created_at)
    }
}

impl Entity for SessionInfo {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Active sessions, most recently seen first.
pub fn active_sessions(sessions: &[SessionInfo], now: DateTime<Utc>) -> Vec<&SessionInfo> {
    let mut active: Vec<&SessionInfo> = sessions.iter().filter(|s| s.is_active(now)).collect();
    active.sort_by(|a, b| b.last_seen().cmp(&a.last_seen()));
    active
}
