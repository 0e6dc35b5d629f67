//! `labyrinth-check`: evaluate an access requirement against a user snapshot.
//!
//! Kept as a library so the argument handling and report are testable
//! without spawning the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use labyrinth_auth::{AccessExplanation, AccessRequirement, AuthConfig, AuthUser, PermissionEvaluator};

#[derive(Debug, Parser)]
#[command(
    name = "labyrinth-check",
    version,
    about = "Check whether a user satisfies a role/permission requirement"
)]
pub struct Args {
    /// Path to the user JSON (as returned by the login endpoint's `user` field).
    #[arg(long, short = 'u')]
    pub user: PathBuf,

    /// Required role; repeat for several.
    #[arg(long = "role", short = 'r')]
    pub roles: Vec<String>,

    /// Required permission; repeat for several.
    #[arg(long = "permission", short = 'p')]
    pub permissions: Vec<String>,

    /// Any listed role/permission suffices (default: all are required).
    #[arg(long)]
    pub any: bool,

    /// Auth config JSON; defaults to `LABYRINTH_AUTH_CONFIG`, then built-in defaults.
    #[arg(long, short = 'c', env = "LABYRINTH_AUTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Args {
    pub fn requirement(&self) -> AccessRequirement {
        let requirement = AccessRequirement::new()
            .roles(self.roles.iter().cloned())
            .permissions(self.permissions.iter().cloned());
        if self.any { requirement.any() } else { requirement }
    }
}

/// Report printed on stdout.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub user: String,
    pub is_admin: bool,
    #[serde(flatten)]
    pub explanation: AccessExplanation,
}

pub fn load_user(path: &Path) -> Result<AuthUser> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read user file {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid user JSON in {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<AuthConfig> {
    match path {
        Some(path) => AuthConfig::from_file(path)
            .with_context(|| format!("failed to load auth config {}", path.display())),
        None => Ok(AuthConfig::default()),
    }
}

pub fn evaluate(user: &AuthUser, requirement: &AccessRequirement, config: &AuthConfig) -> Report {
    let evaluator = PermissionEvaluator::for_user(user).with_admin_roles(&config.admin_roles);
    let explanation = evaluator.explain(requirement);

    tracing::debug!(
        user_id = %user.id,
        granted = explanation.granted,
        missing_roles = ?explanation.missing_roles,
        missing_permissions = ?explanation.missing_permissions,
        "evaluated requirement"
    );

    Report {
        user: user.display_label(),
        is_admin: evaluator.is_admin(),
        explanation,
    }
}

/// Runs the command; `Ok(true)` when access is granted.
pub fn run(args: &Args) -> Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let user = load_user(&args.user)?;
    let report = evaluate(&user, &args.requirement(), &config);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.explanation.granted)
}
