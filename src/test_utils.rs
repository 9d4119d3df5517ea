//! Shared test utilities for `orderdesk`.
//!
//! This module provides common helper functions for setting up test stores
//! and building test entities with sensible defaults.

use crate::config::database::create_tables;
use crate::core::accounts::register_user;
use crate::core::orders::{Customer, OrderDraft};
use crate::email::EmailService;
use crate::entities::order::{self, LineItem, LineItems, OrderKind, OrderStatus, PayMethod};
use crate::entities::{session, user};
use crate::errors::Result;
use crate::store::{Remote, Store};
use chrono::Utc;
use uuid::Uuid;

/// A store with no remote, no snapshot file and the console email provider.
/// This is the standard setup for pure bookkeeping tests.
#[must_use]
pub fn offline_store() -> Store {
    Store::offline()
}

/// A remote handle over a fresh in-memory `SQLite` store with all tables
/// created.
pub async fn remote_in_memory() -> Result<Remote> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(Remote::new(db))
}

/// A store wired to an in-memory remote. This is the standard setup for
/// mirror and persistence tests.
pub async fn store_with_remote() -> Result<Store> {
    let remote = remote_in_memory().await?;
    Ok(Store::new(Some(remote), None, EmailService::console()))
}

/// A checkout customer with sensible defaults.
#[must_use]
pub fn test_customer() -> Customer {
    Customer {
        name: "Test Customer".to_string(),
        phone: "90000000".to_string(),
        email: "customer@example.com".to_string(),
        method: PayMethod::MobileCash,
        payment_ref: "TX12345".to_string(),
    }
}

/// A plain service line item.
#[must_use]
pub fn test_item() -> LineItem {
    test_item_of_kind(OrderKind::Service)
}

/// A line item of a specific kind.
#[must_use]
pub fn test_item_of_kind(kind: OrderKind) -> LineItem {
    LineItem {
        name: format!("Test {}", kind.as_str()),
        unit_price: 5000,
        kind,
        details: None,
        session_id: None,
        option: None,
    }
}

/// A checkout draft carrying one service item and no coupon.
#[must_use]
pub fn test_draft(amount: i64) -> OrderDraft {
    OrderDraft {
        customer: test_customer(),
        items: vec![test_item()],
        amount,
        coupon_code: None,
        referrer_id: None,
    }
}

/// A pending order model built directly, bypassing the checkout flow.
#[must_use]
pub fn test_order() -> order::Model {
    let now = Utc::now();
    order::Model {
        id: Uuid::new_v4().to_string(),
        name: "Test Customer".to_string(),
        phone: "90000000".to_string(),
        email: "customer@example.com".to_string(),
        method: PayMethod::MobileCash,
        payment_ref: "TX12345".to_string(),
        amount: 5000,
        kind: OrderKind::Service,
        items: LineItems(vec![test_item()]),
        status: OrderStatus::Pending,
        code: None,
        code_expires_at: None,
        is_completed: false,
        service_progress: None,
        delivered_file: None,
        coupon_code: None,
        referrer_id: None,
        created_at: now,
        updated_at: now,
    }
}

/// A session with 15 of 15 seats open.
#[must_use]
pub fn test_session(id: &str) -> session::Model {
    session::Model {
        id: id.to_string(),
        title: "Test Session".to_string(),
        dates: "5-9 January".to_string(),
        total: 15,
        available: 15,
        updated_at: Utc::now(),
    }
}

/// A user model built directly, bypassing registration.
#[must_use]
pub fn test_user(email: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id: Uuid::new_v4().to_string(),
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$test-placeholder".to_string(),
        registered_at: now,
        is_ambassador: true,
        ambassador_code: Some("TST-100".to_string()),
        balance: 0,
        withdrawals: user::Withdrawals::default(),
        updated_at: now,
    }
}

/// Registers a user through the normal flow with the password `"hunter2"`.
///
/// # Panics
/// Panics when registration fails; tests treat that as a setup error.
pub async fn registered_user(store: &Store, name: &str, email: &str) -> user::Model {
    #[allow(clippy::unwrap_used)]
    register_user(store, name, email, "hunter2").await.unwrap()
}
