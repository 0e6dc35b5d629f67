//! Auth configuration: token storage, session timing, redirect routes.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SessionPolicy;
use crate::authorize::DEFAULT_ADMIN_ROLES;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "LABYRINTH_AUTH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    #[default]
    Memory,
    Local,
    Session,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenSettings {
    pub storage: TokenStorage,
}

/// Where guards and the login flow send the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthRoutes {
    pub login: String,
    pub unauthorized: String,
    pub after_login: String,
    pub after_logout: String,
}

impl Default for AuthRoutes {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            unauthorized: "/unauthorized".to_string(),
            after_login: "/dashboard".to_string(),
            after_logout: "/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    pub token: TokenSettings,
    pub session: SessionPolicy,
    pub routes: AuthRoutes,
    pub admin_roles: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: TokenSettings::default(),
            session: SessionPolicy::default(),
            routes: AuthRoutes::default(),
            admin_roles: DEFAULT_ADMIN_ROLES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl AuthConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from the file named by `LABYRINTH_AUTH_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                tracing::debug!(path = ?path, "loading auth config");
                Self::from_file(PathBuf::from(path))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.inactivity_timeout_ms == 0 {
            return Err(invalid("session.inactivityTimeoutMs must be positive"));
        }
        if self.session.warning_threshold_ms >= self.session.inactivity_timeout_ms {
            return Err(invalid(
                "session.warningThresholdMs must be shorter than session.inactivityTimeoutMs",
            ));
        }

        let routes = [
            ("routes.login", &self.routes.login),
            ("routes.unauthorized", &self.routes.unauthorized),
            ("routes.afterLogin", &self.routes.after_login),
            ("routes.afterLogout", &self.routes.after_logout),
        ];
        for (field, route) in routes {
            if !route.starts_with('/') {
                return Err(invalid(format!("{field} must start with '/' (got '{route}')")));
            }
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    let msg = msg.into();
    tracing::warn!(reason = %msg, "rejected auth config");
    ConfigError::Invalid(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AuthConfig::from_json("{}").unwrap();
        assert_eq!(config, AuthConfig::default());
        assert_eq!(config.token.storage, TokenStorage::Memory);
        assert_eq!(config.session.inactivity_timeout_ms, 30 * 60 * 1000);
        assert_eq!(config.session.refresh_before_expiry_ms, 2 * 60 * 1000);
        assert_eq!(config.routes.unauthorized, "/unauthorized");
        assert_eq!(config.admin_roles, vec!["admin", "administrator", "superadmin"]);
    }

    #[test]
    fn partial_documents_merge_with_defaults() {
        let config = AuthConfig::from_json(
            r#"{
                "token": {"storage": "session"},
                "session": {"inactivityTimeoutMs": 600000},
                "routes": {"afterLogin": "/home"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.token.storage, TokenStorage::Session);
        assert_eq!(config.session.inactivity_timeout_ms, 600_000);
        assert_eq!(config.session.warning_threshold_ms, 5 * 60 * 1000);
        assert_eq!(config.routes.after_login, "/home");
        assert_eq!(config.routes.login, "/login");
    }

    #[test]
    fn rejects_inconsistent_timing_and_relative_routes() {
        let err = AuthConfig::from_json(
            r#"{"session": {"inactivityTimeoutMs": 60000, "warningThresholdMs": 60000}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AuthConfig::from_json(r#"{"routes": {"login": "login"}}"#).unwrap_err();
        assert!(err.to_string().contains("routes.login"));

        let err = AuthConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_config_files() {
        let path = std::env::temp_dir().join(format!(
            "labyrinth-auth-config-{}.json",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, r#"{"adminRoles": ["root"]}"#).unwrap();

        let config = AuthConfig::from_file(&path).unwrap();
        assert_eq!(config.admin_roles, vec!["root"]);
        std::fs::remove_file(&path).unwrap();

        let err = AuthConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn env_var_selects_the_config_file() {
        let path = std::env::temp_dir().join(format!(
            "labyrinth-auth-env-{}.json",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, r#"{"routes": {"login": "/sign-in"}}"#).unwrap();

        // SAFETY: no other test in this crate reads or writes this variable.
        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };
        assert_eq!(AuthConfig::from_env().unwrap(), AuthConfig::default());

        unsafe { std::env::set_var(CONFIG_ENV_VAR, &path) };
        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.routes.login, "/sign-in");
        assert_eq!(config.routes.unauthorized, "/unauthorized");

        std::fs::remove_file(&path).unwrap();
        let err = AuthConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };
    }
}
