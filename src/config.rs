use std::env;
use std::path::PathBuf;

use crate::models::DueDateField;

/// Application-level constants
pub const APP_NAME: &str = "Jobtrail";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Days between applying and the suggested follow-up nudge.
pub const DEFAULT_FOLLOWUP_DAYS: i64 = 7;

/// Env var overriding the database location.
pub const DB_ENV: &str = "JOBTRAIL_DB";

/// Env var selecting which date field drives "overdue"
/// (`next_action` or `followup`).
pub const DUE_FIELD_ENV: &str = "JOBTRAIL_DUE_FIELD";

/// Get the application data directory
/// ~/Jobtrail/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Jobtrail")
}

/// Get the database path, honoring the `JOBTRAIL_DB` override.
pub fn db_path() -> PathBuf {
    match env::var(DB_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => app_data_dir().join("jobtrail.db"),
    }
}

/// Which date field is treated as the canonical due date for overdue
/// filtering and list ordering.
pub fn due_date_field() -> DueDateField {
    env::var(DUE_FIELD_ENV)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}
