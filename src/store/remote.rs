//! Remote document-store handle.
//!
//! Wraps the `SeaORM` connection with collection-level operations the rest of
//! the crate speaks: fetch whole collections for the mirror, upsert single
//! records after local mutations, and atomically credit commission balances.
//! Every method returns `Result`; callers decide whether a failure degrades
//! to local-only mode or is surfaced.

use crate::entities::{Order, Session, Setting, User, order, session, setting, user};
use crate::errors::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, prelude::DateTimeUtc,
};

/// Handle on the remote store.
#[derive(Debug, Clone)]
pub struct Remote {
    db: DatabaseConnection,
}

fn order_active(m: &order::Model) -> order::ActiveModel {
    order::ActiveModel {
        id: Set(m.id.clone()),
        name: Set(m.name.clone()),
        phone: Set(m.phone.clone()),
        email: Set(m.email.clone()),
        method: Set(m.method),
        payment_ref: Set(m.payment_ref.clone()),
        amount: Set(m.amount),
        kind: Set(m.kind),
        items: Set(m.items.clone()),
        status: Set(m.status),
        code: Set(m.code.clone()),
        code_expires_at: Set(m.code_expires_at),
        is_completed: Set(m.is_completed),
        service_progress: Set(m.service_progress),
        delivered_file: Set(m.delivered_file.clone()),
        coupon_code: Set(m.coupon_code.clone()),
        referrer_id: Set(m.referrer_id.clone()),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    }
}

fn session_active(m: &session::Model) -> session::ActiveModel {
    session::ActiveModel {
        id: Set(m.id.clone()),
        title: Set(m.title.clone()),
        dates: Set(m.dates.clone()),
        total: Set(m.total),
        available: Set(m.available),
        updated_at: Set(m.updated_at),
    }
}

fn user_active(m: &user::Model) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(m.id.clone()),
        name: Set(m.name.clone()),
        email: Set(m.email.clone()),
        password_hash: Set(m.password_hash.clone()),
        registered_at: Set(m.registered_at),
        is_ambassador: Set(m.is_ambassador),
        ambassador_code: Set(m.ambassador_code.clone()),
        balance: Set(m.balance),
        withdrawals: Set(m.withdrawals.clone()),
        updated_at: Set(m.updated_at),
    }
}

fn setting_active(m: &setting::Model) -> setting::ActiveModel {
    setting::ActiveModel {
        id: Set(m.id.clone()),
        enrollment_form_url: Set(m.enrollment_form_url.clone()),
        contract_url: Set(m.contract_url.clone()),
        course_content_url: Set(m.course_content_url.clone()),
        support_chat_link: Set(m.support_chat_link.clone()),
        editor_guide_url: Set(m.editor_guide_url.clone()),
        admin_password_hash: Set(m.admin_password_hash.clone()),
        updated_at: Set(m.updated_at),
    }
}

impl Remote {
    /// Wraps an established connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection, for schema setup and tests.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Whether the store currently answers at all.
    pub async fn ping(&self) -> bool {
        self.db.ping().await.is_ok()
    }

    /// Inserts a freshly created order.
    pub async fn insert_order(&self, order: &order::Model) -> Result<()> {
        Order::insert(order_active(order)).exec(&self.db).await?;
        Ok(())
    }

    /// Writes an order's current state, inserting it if the remote has never
    /// seen it (e.g. an order created while offline).
    pub async fn save_order(&self, order: &order::Model) -> Result<()> {
        Order::insert(order_active(order))
            .on_conflict(
                OnConflict::column(order::Column::Id)
                    .update_columns([
                        order::Column::Name,
                        order::Column::Phone,
                        order::Column::Email,
                        order::Column::Method,
                        order::Column::PaymentRef,
                        order::Column::Amount,
                        order::Column::Kind,
                        order::Column::Items,
                        order::Column::Status,
                        order::Column::Code,
                        order::Column::CodeExpiresAt,
                        order::Column::IsCompleted,
                        order::Column::ServiceProgress,
                        order::Column::DeliveredFile,
                        order::Column::CouponCode,
                        order::Column::ReferrerId,
                        order::Column::CreatedAt,
                        order::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Deletes an order record.
    pub async fn delete_order(&self, id: &str) -> Result<()> {
        Order::delete_by_id(id.to_string()).exec(&self.db).await?;
        Ok(())
    }

    /// The full order collection, newest first.
    pub async fn fetch_orders(&self) -> Result<Vec<order::Model>> {
        Order::find()
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Writes a session's current state.
    pub async fn save_session(&self, session: &session::Model) -> Result<()> {
        Session::insert(session_active(session))
            .on_conflict(
                OnConflict::column(session::Column::Id)
                    .update_columns([
                        session::Column::Title,
                        session::Column::Dates,
                        session::Column::Total,
                        session::Column::Available,
                        session::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// The full session collection.
    pub async fn fetch_sessions(&self) -> Result<Vec<session::Model>> {
        Session::find().all(&self.db).await.map_err(Into::into)
    }

    /// Seeds the session collection from the calendar config, but only when
    /// the collection is still empty so a redeployment cannot clobber live
    /// seat counts.
    pub async fn seed_sessions(&self, sessions: Vec<session::Model>) -> Result<()> {
        let existing = Session::find().limit(1).all(&self.db).await?;
        if !existing.is_empty() || sessions.is_empty() {
            return Ok(());
        }
        Session::insert_many(sessions.iter().map(session_active))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Writes a user's current state.
    pub async fn save_user(&self, user: &user::Model) -> Result<()> {
        User::insert(user_active(user))
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Name,
                        user::Column::Email,
                        user::Column::PasswordHash,
                        user::Column::RegisteredAt,
                        user::Column::IsAmbassador,
                        user::Column::AmbassadorCode,
                        user::Column::Balance,
                        user::Column::Withdrawals,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// The full user collection.
    pub async fn fetch_users(&self) -> Result<Vec<user::Model>> {
        User::find().all(&self.db).await.map_err(Into::into)
    }

    /// Atomically adds `delta` to a user's commission balance.
    ///
    /// A single `UPDATE ... SET balance = balance + ?` statement, so two
    /// concurrent approvals cannot lose a credit to a read-modify-write race.
    pub async fn credit_balance(&self, user_id: &str, delta: i64, now: DateTimeUtc) -> Result<()> {
        User::update_many()
            .col_expr(
                user::Column::Balance,
                Expr::col(user::Column::Balance).add(delta),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// The global-resources document, if it exists yet.
    pub async fn fetch_settings(&self) -> Result<Option<setting::Model>> {
        Setting::find_by_id(setting::GLOBAL_ID.to_string())
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Writes the global-resources document.
    pub async fn save_settings(&self, settings: &setting::Model) -> Result<()> {
        Setting::insert(setting_active(settings))
            .on_conflict(
                OnConflict::column(setting::Column::Id)
                    .update_columns([
                        setting::Column::EnrollmentFormUrl,
                        setting::Column::ContractUrl,
                        setting::Column::CourseContentUrl,
                        setting::Column::SupportChatLink,
                        setting::Column::EditorGuideUrl,
                        setting::Column::AdminPasswordHash,
                        setting::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
