//! Session seat tracking.
//!
//! Seat counts are adjusted manually by the administrator. The only rule
//! enforced here is `available >= 0`; the seeded `total` is not a ceiling,
//! matching how the storefront has always behaved. `reset_seats` reopens the
//! session at its seeded capacity.

use crate::entities::session;
use crate::errors::{Error, Result};
use crate::store::Store;
use chrono::{DateTime, Utc};
use tracing::warn;

async fn update_session<F>(store: &Store, id: &str, now: DateTime<Utc>, apply: F) -> Result<session::Model>
where
    F: FnOnce(&mut session::Model),
{
    let updated = {
        let mut state = store.state.write().await;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::SessionNotFound { id: id.to_string() })?;
        apply(session);
        session.updated_at = now;
        session.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_session(&updated).await {
            warn!(session = %updated.id, error = %e, "seat change not mirrored");
        }
    }
    Ok(updated)
}

/// Overwrites a session's open-seat count, clamped to zero.
pub async fn adjust_seats(store: &Store, id: &str, new_available: i32) -> Result<session::Model> {
    update_session(store, id, Utc::now(), |session| {
        session.available = new_available.max(0);
    })
    .await
}

/// Reopens every seat: `available` returns to the session's seeded `total`,
/// whatever the current count is.
pub async fn reset_seats(store: &Store, id: &str) -> Result<session::Model> {
    update_session(store, id, Utc::now(), |session| {
        session.available = session.total;
    })
    .await
}
