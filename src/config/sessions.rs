//! Session seed data from config.toml.
//!
//! The training calendar ships in a TOML file; the entries seed both the
//! remote `sessions` collection on first run and the offline defaults used
//! when neither a snapshot nor a remote store is available.

use crate::entities::session;
use crate::errors::{Error, Result};
use sea_orm::prelude::DateTimeUtc;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// List of sessions to seed
    pub sessions: Vec<SessionConfig>,
}

/// Configuration for a single training session
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Stable id (e.g. `"jan-1"`)
    pub id: String,
    /// Display title
    pub title: String,
    /// Human-readable date-range label
    pub dates: String,
    /// Seat capacity; `available` starts here and `reset` returns here
    pub total: i32,
}

impl SessionConfig {
    /// Builds the session record this seed entry describes, with all seats
    /// open, stamped at `now`.
    #[must_use]
    pub fn into_model(self, now: DateTimeUtc) -> session::Model {
        session::Model {
            id: self.id,
            title: self.title,
            dates: self.dates,
            total: self.total,
            available: self.total,
            updated_at: now,
        }
    }
}

/// Loads the session seed list from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the session seed list from the default location (./config.toml).
pub fn load_default_config() -> Result<SeedConfig> {
    load_config("config.toml")
}
