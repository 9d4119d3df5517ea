//! State container - the single place application state lives.
//!
//! A [`Store`] owns the in-memory collections, the notification queue, an
//! optional remote handle and an optional snapshot path. It is constructed
//! once at startup and passed by reference to every operation; there is no
//! ambient global. The in-memory state is canonical for the running process;
//! the snapshot and the remote mirror trail it.

/// Short-lived user-facing status messages
pub mod notify;
/// Remote document-store handle
pub mod remote;
/// Local JSON snapshot persistence
pub mod snapshot;
/// Pull-based remote mirror with per-record reconciliation
pub mod sync;

use crate::email::EmailService;
use crate::entities::{order, session, setting, user};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::warn;

pub use notify::{Notification, NotificationQueue, Severity};
pub use remote::Remote;

/// The in-memory collections.
#[derive(Debug, Default)]
pub struct StoreState {
    /// All known orders, newest first
    pub orders: Vec<order::Model>,
    /// The training calendar
    pub sessions: Vec<session::Model>,
    /// Customer accounts
    pub users: Vec<user::Model>,
    /// The global-resources document, once synced or edited
    pub resources: Option<setting::Model>,
    /// Id of the signed-in user, if any
    pub current_user: Option<String>,
}

/// Dependency-injected state store shared by all components.
#[derive(Debug)]
pub struct Store {
    pub(crate) state: RwLock<StoreState>,
    pub(crate) notices: NotificationQueue,
    pub(crate) remote: Option<Remote>,
    pub(crate) snapshot_path: Option<PathBuf>,
    pub(crate) email: EmailService,
    connected: AtomicBool,
}

impl Store {
    /// Builds a store. `remote: None` runs fully local; `snapshot_path: None`
    /// skips durable local persistence (used by tests).
    #[must_use]
    pub fn new(remote: Option<Remote>, snapshot_path: Option<PathBuf>, email: EmailService) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            notices: NotificationQueue::new(),
            remote,
            snapshot_path,
            email,
            connected: AtomicBool::new(false),
        }
    }

    /// A store with no remote, no snapshot and the console email provider.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(None, None, EmailService::console())
    }

    /// Replaces state from a snapshot; `default_sessions` fills the calendar
    /// when the snapshot carries none (first run).
    pub async fn hydrate(&self, snap: snapshot::Snapshot, default_sessions: Vec<session::Model>) {
        let mut state = self.state.write().await;
        state.orders = snap.orders;
        state.sessions = if snap.sessions.is_empty() {
            default_sessions
        } else {
            snap.sessions
        };
        state.users = snap.users;
        state.resources = snap.resources;
        state.current_user = snap.current_user;
    }

    /// Writes the snapshot file. Failures are logged and swallowed: losing a
    /// snapshot write degrades durability, not correctness.
    pub async fn persist(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        let snap = {
            let state = self.state.read().await;
            snapshot::Snapshot {
                orders: state.orders.clone(),
                sessions: state.sessions.clone(),
                users: state.users.clone(),
                resources: state.resources.clone(),
                current_user: state.current_user.clone(),
            }
        };
        if let Err(e) = snapshot::save(path, &snap) {
            warn!(path = %path.display(), error = %e, "snapshot not written");
        }
    }

    /// Current orders, newest first.
    pub async fn orders(&self) -> Vec<order::Model> {
        self.state.read().await.orders.clone()
    }

    /// Current training calendar.
    pub async fn sessions(&self) -> Vec<session::Model> {
        self.state.read().await.sessions.clone()
    }

    /// Current user accounts.
    pub async fn users(&self) -> Vec<user::Model> {
        self.state.read().await.users.clone()
    }

    /// The global-resources document, if known.
    pub async fn resources(&self) -> Option<setting::Model> {
        self.state.read().await.resources.clone()
    }

    /// Queues a user-facing status message.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) {
        self.notices.push(message, severity);
    }

    /// Unexpired notifications, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notices.active()
    }

    /// Dismisses one notification early.
    pub fn dismiss_notification(&self, id: &str) {
        self.notices.dismiss(id);
    }

    /// Whether the last mirror cycle reached the remote store. Display only;
    /// no correctness decision hangs off this.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}
