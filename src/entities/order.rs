//! Order entity - Represents a customer purchase moving through its lifecycle.
//!
//! Each order carries the customer contact block, the mobile-money payment
//! reference, an embedded list of line items, and the lifecycle fields the
//! admin panel mutates: status, access code with expiry, completion flag and
//! delivered-file descriptor. Line items and the delivered file are stored as
//! JSON columns so the row matches the remote document shape.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order. Starts at `Pending`; an administrator moves
/// it to `Approved` or `Rejected` exactly once.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting payment verification by an administrator
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Payment verified; an access code has been issued
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Payment could not be verified
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Category of an order or of a single line item. The order-level kind is
/// derived from the items it contains and drives coupon eligibility and
/// notification wording downstream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// One-off document service (report, CV, poster, ...)
    #[sea_orm(string_value = "service")]
    Service,
    /// Enrollment in a single training session
    #[sea_orm(string_value = "enrollment")]
    Enrollment,
    /// Seat reservation deposit for the full program
    #[sea_orm(string_value = "reservation")]
    Reservation,
    /// Full training program purchase
    #[sea_orm(string_value = "full_program")]
    FullProgram,
    /// AI resource pack purchase
    #[sea_orm(string_value = "ai_pack")]
    AiPack,
}

impl OrderKind {
    /// Stable string form, matching the stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Enrollment => "enrollment",
            Self::Reservation => "reservation",
            Self::FullProgram => "full_program",
            Self::AiPack => "ai_pack",
        }
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mobile-money rail the customer paid through.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PayMethod {
    /// USSD cash-transfer rail
    #[sea_orm(string_value = "mobile_cash")]
    MobileCash,
    /// Wallet-app rail
    #[sea_orm(string_value = "mobile_wallet")]
    MobileWallet,
}

impl PayMethod {
    /// Stable string form, matching the stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MobileCash => "mobile_cash",
            Self::MobileWallet => "mobile_wallet",
        }
    }
}

/// Variant of a service item the customer picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOption {
    /// Delivery of the finished document only
    Standard,
    /// Delivery plus a guided walkthrough
    Assisted,
}

/// A single cart line. Owned by the order (or transient cart) that contains
/// it; it has no lifecycle of its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name of the purchased item
    pub name: String,
    /// Unit price in the smallest currency unit
    pub unit_price: i64,
    /// Item category, feeds the order-level kind and coupon eligibility
    pub kind: OrderKind,
    /// Free-text detail entered by the customer (page count, topic, ...)
    #[serde(default)]
    pub details: Option<String>,
    /// Training session this item books a seat in, if any
    #[serde(default)]
    pub session_id: Option<String>,
    /// Selected option variant, if the item has one
    #[serde(default)]
    pub option: Option<ItemOption>,
}

/// Embedded line-item list, stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct LineItems(pub Vec<LineItem>);

/// Descriptor of a file delivered against an approved order, stored as a JSON
/// column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct DeliveredFile {
    /// Display name of the delivered file
    pub name: String,
    /// Download location
    pub url: String,
    /// When the file was attached
    pub delivered_at: DateTimeUtc,
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Opaque document id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Customer full name
    pub name: String,
    /// Customer phone number (also the chat contact)
    pub phone: String,
    /// Customer email; may be empty when the customer skipped it
    pub email: String,
    /// Mobile-money rail used for payment
    pub method: PayMethod,
    /// Payment reference from the operator's confirmation SMS
    pub payment_ref: String,
    /// Total charged, in the smallest currency unit; never negative
    pub amount: i64,
    /// Order category derived from its items
    pub kind: OrderKind,
    /// Embedded line items; non-empty at creation
    pub items: LineItems,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Access code; present exactly when status is `Approved`
    pub code: Option<String>,
    /// Wall-clock expiry of the access code
    pub code_expires_at: Option<DateTimeUtc>,
    /// Whether the work behind the order has been certified complete
    pub is_completed: bool,
    /// Delivery progress percentage (0-100)
    pub service_progress: Option<i32>,
    /// File delivered against this order, if any
    pub delivered_file: Option<DeliveredFile>,
    /// Coupon code the customer applied at checkout
    pub coupon_code: Option<String>,
    /// Ambassador credited when this order is approved
    pub referrer_id: Option<String>,
    /// When the order was created
    pub created_at: DateTimeUtc,
    /// Last modification time; drives per-record reconciliation
    pub updated_at: DateTimeUtc,
}

/// Orders embed their line items, so they relate to no other entity
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
