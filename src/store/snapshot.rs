//! Local persistence adapter.
//!
//! After every state change the store serializes its collections to a JSON
//! snapshot on disk; at startup the snapshot is rehydrated before the remote
//! mirror attaches. Loading never fails: missing or corrupt data falls back
//! to built-in defaults so a damaged file cannot take the application down.

use crate::entities::{order, session, setting, user};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// On-disk image of the store's durable collections. Notifications are
/// deliberately absent: they die with the process.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All known orders, newest first
    #[serde(default)]
    pub orders: Vec<order::Model>,
    /// The training calendar
    #[serde(default)]
    pub sessions: Vec<session::Model>,
    /// Customer accounts
    #[serde(default)]
    pub users: Vec<user::Model>,
    /// The global-resources document, if one has been synced or edited
    #[serde(default)]
    pub resources: Option<setting::Model>,
    /// Id of the signed-in user, if any
    #[serde(default)]
    pub current_user: Option<String>,
}

/// Writes a snapshot, creating parent directories as needed.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a snapshot back, tolerating absence and corruption.
///
/// A missing file is the normal first-run case and returns `None` silently; a
/// file that exists but fails to parse is logged and also returns `None` so
/// the caller proceeds with defaults.
#[must_use]
pub fn load(path: &Path) -> Option<Snapshot> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot unreadable, starting from defaults");
            None
        }
    }
}
