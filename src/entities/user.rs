//! User entity - Customer accounts and the ambassador ledger.
//!
//! The email is the login key (matched case-insensitively) and the password
//! is stored as an Argon2id PHC hash, never in clear. Ambassadors carry a
//! unique referral code and a commission balance credited on order approval.
//! Withdrawal history is embedded as a JSON column.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement state of a single commission withdrawal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Requested, not yet paid out
    Pending,
    /// Paid out through the support channel
    Paid,
}

/// One commission withdrawal from an ambassador balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// Amount withdrawn, in the smallest currency unit
    pub amount: i64,
    /// When the withdrawal was requested
    pub date: DateTimeUtc,
    /// Settlement state
    pub status: WithdrawalStatus,
}

/// Embedded withdrawal history, stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Withdrawals(pub Vec<Withdrawal>);

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Opaque document id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email, unique case-insensitively
    pub email: String,
    /// Argon2id PHC hash of the password
    pub password_hash: String,
    /// When the account was created
    pub registered_at: DateTimeUtc,
    /// Whether this user has activated the ambassador program
    pub is_ambassador: bool,
    /// Referral code, unique across active ambassadors
    pub ambassador_code: Option<String>,
    /// Commission balance, in the smallest currency unit
    pub balance: i64,
    /// Embedded withdrawal history
    pub withdrawals: Withdrawals,
    /// Last modification time; drives per-record reconciliation
    pub updated_at: DateTimeUtc,
}

/// Users relate to no other entity; orders reference them by id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
