pub mod auth;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod service;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a binary embedding the core.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
