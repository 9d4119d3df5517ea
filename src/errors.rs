//! Unified error type for the whole crate.
//!
//! Validation failures carry structured context so callers can surface a
//! precise message without parsing strings. Remote-store and I/O failures are
//! wrapped transparently; nothing here is retried automatically.

use crate::entities::order::OrderStatus;
use thiserror::Error;

/// All failures the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading or parsing configuration
        message: String,
    },

    #[error("Remote store error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Password error: {message}")]
    Password {
        /// Underlying argon2 failure, stringified
        message: String,
    },

    #[error("Order has no items")]
    EmptyOrder,

    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount, in the smallest currency unit
        amount: i64,
    },

    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Order id that failed to resolve
        id: String,
    },

    #[error("Order {id} is not approved")]
    OrderNotApproved {
        /// Order id whose status blocked the operation
        id: String,
    },

    #[error("Cannot change order status from {from} to {to}")]
    InvalidStatusChange {
        /// Status the order currently has
        from: OrderStatus,
        /// Status the caller asked for
        to: OrderStatus,
    },

    #[error("Session not found: {id}")]
    SessionNotFound {
        /// Session id that failed to resolve
        id: String,
    },

    #[error("User not found: {id}")]
    UserNotFound {
        /// User id or email that failed to resolve
        id: String,
    },

    #[error("An account already exists for {email}")]
    EmailTaken {
        /// The conflicting login email
        email: String,
    },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Coupon code {code} is not valid")]
    CouponInvalid {
        /// The rejected coupon code, normalized to uppercase
        code: String,
    },

    #[error("No item in this order is eligible for a coupon")]
    CouponNotEligible,

    #[error("Ambassador code {code} is already in use")]
    AmbassadorCodeTaken {
        /// The colliding referral code
        code: String,
    },

    #[error("User {id} is not an ambassador")]
    NotAmbassador {
        /// User id lacking the ambassador flag
        id: String,
    },

    #[error("Access code is invalid or not yet approved")]
    CodeInvalid,

    #[error("Access code has expired")]
    CodeExpired,

    #[error("Withdrawal of {amount} is below the minimum of {minimum}")]
    WithdrawalTooSmall {
        /// Requested withdrawal amount
        amount: i64,
        /// Minimum allowed withdrawal
        minimum: i64,
    },

    #[error("Insufficient balance: have {current}, requested {requested}")]
    InsufficientBalance {
        /// Current commission balance
        current: i64,
        /// Amount the withdrawal asked for
        requested: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
