//! Session entity - A scheduled training session with a seat budget.
//!
//! `available` is adjusted manually by the administrator and clamped to zero
//! at the operation layer; it is not validated against `total`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Stable session id from the seed file (e.g. `"jan-1"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display title
    pub title: String,
    /// Human-readable date-range label
    pub dates: String,
    /// Seat capacity as seeded; `reset` restores `available` to this
    pub total: i32,
    /// Seats currently open
    pub available: i32,
    /// Last modification time; drives per-record reconciliation
    pub updated_at: DateTimeUtc,
}

/// Sessions relate to no other entity; items reference them by id only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
