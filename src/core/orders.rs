//! Order lifecycle - Handles creation, status transitions, delivery and
//! deletion of customer orders.
//!
//! All mutations are optimistic: local state changes first and the snapshot
//! is written, then the change is mirrored to the remote store. Order
//! creation is the one place a bounded wait guards the remote write so a
//! slow backend cannot stall checkout; everywhere else remote failures are
//! logged and the local transition stands. Nothing is retried automatically.

use crate::core::codes::{expiry_from, generate_access_code};
use crate::core::coupons::credit_commission;
use crate::email::order_email;
use crate::entities::order::{
    self, DeliveredFile, LineItem, LineItems, OrderKind, OrderStatus, PayMethod,
};
use crate::errors::{Error, Result};
use crate::store::{Severity, Store};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// How long order creation waits for the remote acknowledgment before
/// declaring the order local-only. Exists to keep checkout responsive, not to
/// guarantee durability.
pub const REMOTE_WRITE_WAIT: Duration = Duration::from_secs(5);

/// Customer contact block captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Full name
    pub name: String,
    /// Phone number, doubles as the chat contact
    pub phone: String,
    /// Email; empty when the customer skipped it
    pub email: String,
    /// Mobile-money rail used
    pub method: PayMethod,
    /// Payment reference from the confirmation SMS
    pub payment_ref: String,
}

/// Everything checkout knows about an order before it exists.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Customer contact block
    pub customer: Customer,
    /// Cart contents; must be non-empty
    pub items: Vec<LineItem>,
    /// Total payable, already discounted by the caller
    pub amount: i64,
    /// Coupon code applied at checkout, if any
    pub coupon_code: Option<String>,
    /// Ambassador to credit on approval, if a coupon was applied
    pub referrer_id: Option<String>,
}

/// Derives the order-level kind from its items.
///
/// Precedence mirrors how the storefront labels mixed carts: the most
/// specific purchase wins over plain services.
#[must_use]
pub fn kind_for_items(items: &[LineItem]) -> OrderKind {
    let has = |kind: OrderKind| items.iter().any(|i| i.kind == kind);
    if has(OrderKind::AiPack) {
        OrderKind::AiPack
    } else if has(OrderKind::FullProgram) {
        OrderKind::FullProgram
    } else if has(OrderKind::Reservation) {
        OrderKind::Reservation
    } else if has(OrderKind::Enrollment) {
        OrderKind::Enrollment
    } else {
        OrderKind::Service
    }
}

/// Creates a pending order from a checkout draft.
///
/// The order lands in local state immediately and the snapshot is written;
/// the remote insert then runs under [`REMOTE_WRITE_WAIT`]. On remote failure
/// or timeout the order stays local-only and a degraded-mode notification is
/// queued - there is no automatic retry. The order notification email goes
/// out best-effort either way.
pub async fn create_order(store: &Store, draft: OrderDraft) -> Result<order::Model> {
    if draft.items.is_empty() {
        return Err(Error::EmptyOrder);
    }
    if draft.amount < 0 {
        return Err(Error::InvalidAmount {
            amount: draft.amount,
        });
    }

    let now = Utc::now();
    let order = order::Model {
        id: Uuid::new_v4().to_string(),
        name: draft.customer.name,
        phone: draft.customer.phone,
        email: draft.customer.email,
        method: draft.customer.method,
        payment_ref: draft.customer.payment_ref,
        amount: draft.amount,
        kind: kind_for_items(&draft.items),
        items: LineItems(draft.items),
        status: OrderStatus::Pending,
        code: None,
        code_expires_at: None,
        is_completed: false,
        service_progress: None,
        delivered_file: None,
        coupon_code: draft.coupon_code.map(|c| c.trim().to_uppercase()),
        referrer_id: draft.referrer_id,
        created_at: now,
        updated_at: now,
    };

    {
        let mut state = store.state.write().await;
        state.orders.insert(0, order.clone());
    }
    store.persist().await;

    match &store.remote {
        Some(remote) => {
            match tokio::time::timeout(REMOTE_WRITE_WAIT, remote.insert_order(&order)).await {
                Ok(Ok(())) => store.notify("Order saved to the cloud.", Severity::Success),
                Ok(Err(e)) => {
                    warn!(order = %order.id, error = %e, "remote write failed, order is local-only");
                    store.notify(
                        "Cloud error. Order saved on this device only.",
                        Severity::Error,
                    );
                }
                Err(_) => {
                    warn!(order = %order.id, "remote write timed out, order is local-only");
                    store.notify(
                        "Cloud error. Order saved on this device only.",
                        Severity::Error,
                    );
                }
            }
        }
        None => store.notify("Saved on this device (offline mode).", Severity::Info),
    }

    store.email.send_silently(&order_email(&order)).await;
    Ok(order)
}

/// Moves a pending order to `Approved` or `Rejected`.
///
/// Approval attaches a fresh access code expiring 48 hours from `now` and
/// credits the referrer's commission - exactly once, because only the
/// `Pending` state accepts a transition and an order never returns to it.
/// Remote persistence failures are logged; the local transition stands.
pub async fn set_status(
    store: &Store,
    id: &str,
    status: OrderStatus,
    now: DateTime<Utc>,
) -> Result<order::Model> {
    let (updated, referrer) = {
        let mut state = store.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::OrderNotFound { id: id.to_string() })?;

        if order.status != OrderStatus::Pending || status == OrderStatus::Pending {
            return Err(Error::InvalidStatusChange {
                from: order.status,
                to: status,
            });
        }

        order.status = status;
        if status == OrderStatus::Approved {
            order.code = Some(generate_access_code());
            order.code_expires_at = Some(expiry_from(now));
        } else {
            order.code = None;
            order.code_expires_at = None;
        }
        order.updated_at = now;

        let referrer = (status == OrderStatus::Approved)
            .then(|| order.referrer_id.clone())
            .flatten();
        (order.clone(), referrer)
    };

    if let Some(referrer_id) = referrer {
        credit_commission(store, &referrer_id, now).await;
    }
    store.persist().await;

    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_order(&updated).await {
            warn!(order = %updated.id, error = %e, "status change not mirrored");
        }
    }
    store.notify("Order updated.", Severity::Info);
    Ok(updated)
}

/// Replaces the access code of an approved order and restarts the 48-hour
/// expiry window from `now`.
pub async fn regenerate_code(
    store: &Store,
    id: &str,
    now: DateTime<Utc>,
) -> Result<order::Model> {
    let updated = {
        let mut state = store.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::OrderNotFound { id: id.to_string() })?;
        if order.status != OrderStatus::Approved {
            return Err(Error::OrderNotApproved { id: id.to_string() });
        }
        order.code = Some(generate_access_code());
        order.code_expires_at = Some(expiry_from(now));
        order.updated_at = now;
        order.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_order(&updated).await {
            warn!(order = %updated.id, error = %e, "code regeneration not mirrored");
        }
    }
    Ok(updated)
}

/// Flips the completion/certification flag. Returns the new value.
pub async fn toggle_completion(store: &Store, id: &str) -> Result<bool> {
    let updated = {
        let mut state = store.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::OrderNotFound { id: id.to_string() })?;
        order.is_completed = !order.is_completed;
        order.updated_at = Utc::now();
        order.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_order(&updated).await {
            warn!(order = %updated.id, error = %e, "completion toggle not mirrored");
        }
    }
    Ok(updated.is_completed)
}

/// Attaches a delivered-file descriptor and marks delivery complete.
pub async fn record_delivery(
    store: &Store,
    id: &str,
    file_name: &str,
    file_url: &str,
    now: DateTime<Utc>,
) -> Result<order::Model> {
    let updated = {
        let mut state = store.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::OrderNotFound { id: id.to_string() })?;
        order.delivered_file = Some(DeliveredFile {
            name: file_name.to_string(),
            url: file_url.to_string(),
            delivered_at: now,
        });
        order.service_progress = Some(100);
        order.updated_at = now;
        order.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_order(&updated).await {
            warn!(order = %updated.id, error = %e, "delivery not mirrored");
        }
    }
    Ok(updated)
}

/// Sets delivery progress, clamped to 0-100.
pub async fn update_progress(store: &Store, id: &str, progress: i32) -> Result<order::Model> {
    let updated = {
        let mut state = store.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::OrderNotFound { id: id.to_string() })?;
        order.service_progress = Some(progress.clamp(0, 100));
        order.updated_at = Utc::now();
        order.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_order(&updated).await {
            warn!(order = %updated.id, error = %e, "progress not mirrored");
        }
    }
    Ok(updated)
}

/// Removes an order locally and from the remote store.
///
/// The remote delete always runs; skipping it would resurrect the order on
/// the next mirror cycle. A remote failure is logged and the local removal
/// stands.
pub async fn delete_order(store: &Store, id: &str) -> Result<()> {
    {
        let mut state = store.state.write().await;
        let before = state.orders.len();
        state.orders.retain(|o| o.id != id);
        if state.orders.len() == before {
            return Err(Error::OrderNotFound { id: id.to_string() });
        }
    }

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.delete_order(id).await {
            warn!(order = %id, error = %e, "remote delete failed, record may resurface");
        }
    }
    Ok(())
}

/// Wipes the local order list. Remote records are left in place as the audit
/// trail.
pub async fn clear_orders(store: &Store) {
    {
        let mut state = store.state.write().await;
        state.orders.clear();
    }
    store.persist().await;
}

/// A customer's own orders, newest first.
pub async fn orders_for_email(store: &Store, email: &str) -> Vec<order::Model> {
    let state = store.state.read().await;
    let mut mine: Vec<order::Model> = state
        .orders
        .iter()
        .filter(|o| !o.email.is_empty() && o.email.eq_ignore_ascii_case(email))
        .cloned()
        .collect();
    mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    mine
}
