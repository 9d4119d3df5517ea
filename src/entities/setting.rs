//! Settings entity - The singleton global-resources document.
//!
//! A single row (id `"global"`) holds the external resource links surfaced in
//! the storefront plus the admin password hash. Mutated only through admin
//! operations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document id of the single settings row.
pub const GLOBAL_ID: &str = "global";

/// Settings database model - global resource links and admin credentials
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Always [`GLOBAL_ID`]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Enrollment form link
    pub enrollment_form_url: Option<String>,
    /// Contract template link
    pub contract_url: Option<String>,
    /// Course content link
    pub course_content_url: Option<String>,
    /// Support chat deep-link base
    pub support_chat_link: Option<String>,
    /// Editor guide link
    pub editor_guide_url: Option<String>,
    /// Argon2id PHC hash of the admin password; None means admin access is
    /// disabled until bootstrapped
    pub admin_password_hash: Option<String>,
    /// Last modification time
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// An empty settings document stamped at `now`.
    #[must_use]
    pub fn global(now: DateTimeUtc) -> Self {
        Self {
            id: GLOBAL_ID.to_string(),
            enrollment_form_url: None,
            contract_url: None,
            course_content_url: None,
            support_chat_link: None,
            editor_guide_url: None,
            admin_password_hash: None,
            updated_at: now,
        }
    }
}

/// The settings document stands alone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
