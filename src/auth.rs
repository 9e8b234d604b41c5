//! Credential gate for the single user.
//!
//! Configuration comes from the environment: `JOBTRAIL_USER` names the
//! account, `JOBTRAIL_PASS_SHA256` holds the hex SHA-256 digest of the
//! password. The check is stateless; callers run it before any core
//! operation and keep their own notion of a logged-in session.

use std::env;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

pub const USER_ENV: &str = "JOBTRAIL_USER";
pub const PASS_ENV: &str = "JOBTRAIL_PASS_SHA256";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Auth not configured: set JOBTRAIL_USER and JOBTRAIL_PASS_SHA256")]
    NotConfigured,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Hex SHA-256 digest of a password, the format `JOBTRAIL_PASS_SHA256`
/// expects. Exposed so a setup script can generate the value.
pub fn password_digest(password: &str) -> String {
    let hash = Sha256::digest(password.as_bytes());
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Check the supplied credentials against the environment configuration.
pub fn require_login(username: &str, password: &str) -> Result<(), AuthError> {
    let configured_user = env::var(USER_ENV).unwrap_or_default();
    let configured_digest = env::var(PASS_ENV).unwrap_or_default();
    check_credentials(username, password, &configured_user, &configured_digest)
}

fn check_credentials(
    username: &str,
    password: &str,
    configured_user: &str,
    configured_digest: &str,
) -> Result<(), AuthError> {
    if configured_user.is_empty() || configured_digest.is_empty() {
        return Err(AuthError::NotConfigured);
    }

    // Constant-time comparison to prevent timing attacks; both checks
    // always run before the combined verdict.
    let supplied_digest = password_digest(password);
    let user_ok = username.as_bytes().ct_eq(configured_user.as_bytes());
    let pass_ok = supplied_digest
        .as_bytes()
        .ct_eq(configured_digest.to_lowercase().as_bytes());

    if (user_ok & pass_ok).unwrap_u8() == 1 {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}
