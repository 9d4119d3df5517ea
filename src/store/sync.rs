//! Remote mirror - keeps local state trailing the remote collections.
//!
//! Each cycle pulls the `orders`, `sessions`, `users` and `settings`
//! collections and reconciles them into local state per record: records are
//! matched by id and the side with the newer `updated_at` wins. Local-only
//! records (for example an order created while the remote was down) survive a
//! snapshot that lacks them, so an optimistic write can no longer be wiped by
//! a stale mirror pull. Cycle failures flip the connectivity flag and are
//! otherwise swallowed: the mirror degrades, the store keeps working.

use crate::entities::{order, session, user};
use crate::errors::Result;
use crate::store::Store;
use sea_orm::prelude::DateTimeUtc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Merges a remote collection into the local one, record by record.
///
/// A remote record replaces its local counterpart only when it is at least as
/// new; unmatched remote records are appended; unmatched local records are
/// kept. Nothing is ever deleted here - deletion flows through the explicit
/// delete operations only.
fn merge_by_id<T>(
    local: &mut Vec<T>,
    remote: Vec<T>,
    id: impl Fn(&T) -> &str,
    updated_at: impl Fn(&T) -> DateTimeUtc,
) {
    for incoming in remote {
        match local.iter_mut().find(|held| id(held) == id(&incoming)) {
            Some(held) => {
                if updated_at(&incoming) >= updated_at(held) {
                    *held = incoming;
                }
            }
            None => local.push(incoming),
        }
    }
}

/// Reconciles a remote order snapshot into the local order list and restores
/// newest-first display order.
pub fn reconcile_orders(local: &mut Vec<order::Model>, remote: Vec<order::Model>) {
    merge_by_id(local, remote, |o| &o.id, |o| o.updated_at);
    local.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Reconciles a remote session snapshot into the local calendar.
pub fn reconcile_sessions(local: &mut Vec<session::Model>, remote: Vec<session::Model>) {
    merge_by_id(local, remote, |s| &s.id, |s| s.updated_at);
}

/// Reconciles a remote user snapshot into the local account list.
pub fn reconcile_users(local: &mut Vec<user::Model>, remote: Vec<user::Model>) {
    merge_by_id(local, remote, |u| &u.id, |u| u.updated_at);
}

/// Runs one mirror cycle. A no-op without a remote handle.
pub async fn sync_once(store: &Store) -> Result<()> {
    let Some(remote) = &store.remote else {
        return Ok(());
    };

    let pulled = async {
        let orders = remote.fetch_orders().await?;
        let sessions = remote.fetch_sessions().await?;
        let users = remote.fetch_users().await?;
        let settings = remote.fetch_settings().await?;
        Ok::<_, crate::errors::Error>((orders, sessions, users, settings))
    }
    .await;

    let (orders, sessions, users, settings) = match pulled {
        Ok(collections) => collections,
        Err(e) => {
            store.set_connected(false);
            return Err(e);
        }
    };

    {
        let mut state = store.state.write().await;
        reconcile_orders(&mut state.orders, orders);
        reconcile_sessions(&mut state.sessions, sessions);
        reconcile_users(&mut state.users, users);
        if let Some(incoming) = settings {
            let replace = state
                .resources
                .as_ref()
                .is_none_or(|held| incoming.updated_at >= held.updated_at);
            if replace {
                state.resources = Some(incoming);
            }
        }
    }

    store.set_connected(true);
    store.persist().await;
    debug!("mirror cycle complete");
    Ok(())
}

/// Mirrors forever at the given cadence. Never returns; cycle errors are
/// logged and the loop continues.
pub async fn run(store: Arc<Store>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if let Err(e) = sync_once(&store).await {
            warn!(error = %e, "mirror cycle failed, running local-only");
        }
    }
}
