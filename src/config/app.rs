//! Application configuration from environment variables.
//!
//! Everything here has a workable default except the admin password, which
//! stays unset (admin access disabled) until provided. `.env` loading happens
//! in `main` via dotenvy before this module is consulted.

use std::path::PathBuf;
use std::time::Duration;

/// Default remote store location; `mode=rwc` creates the file on first run.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/orderdesk.sqlite?mode=rwc";
/// Default local snapshot file.
const DEFAULT_SNAPSHOT_PATH: &str = "data/snapshot.json";
/// Default accounting-export directory.
const DEFAULT_REPORTS_DIR: &str = "data/reports";
/// Default mirror cadence in seconds.
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;

/// Runtime settings for the store daemon.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote store connection string
    pub database_url: String,
    /// Local snapshot file written after every state change
    pub snapshot_path: PathBuf,
    /// Directory accounting exports are written to
    pub reports_dir: PathBuf,
    /// How often the mirror pulls remote state
    pub sync_interval: Duration,
    /// Webhook endpoint for the email relay; None selects the console provider
    pub email_webhook_url: Option<String>,
    /// Support phone number used in chat deep links
    pub support_phone: Option<String>,
    /// Plaintext admin password used once to bootstrap the stored hash
    pub admin_password: Option<String>,
}

/// Loads the application configuration from the environment.
///
/// Missing variables fall back to defaults; a malformed `SYNC_INTERVAL_SECS`
/// is treated as missing rather than fatal.
#[must_use]
pub fn load_app_configuration() -> AppConfig {
    let sync_interval_secs = std::env::var("SYNC_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS);

    AppConfig {
        database_url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
        snapshot_path: std::env::var("SNAPSHOT_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_SNAPSHOT_PATH), PathBuf::from),
        reports_dir: std::env::var("REPORTS_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_REPORTS_DIR), PathBuf::from),
        sync_interval: Duration::from_secs(sync_interval_secs),
        email_webhook_url: std::env::var("EMAIL_WEBHOOK_URL").ok(),
        support_phone: std::env::var("SUPPORT_PHONE").ok(),
        admin_password: std::env::var("ADMIN_PASSWORD").ok(),
    }
}
