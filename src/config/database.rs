//! Remote store connection and schema creation.
//!
//! The remote document store is reached through `SeaORM`; collections are the
//! entities in [`crate::entities`] and tables are generated from them with
//! `Schema::create_table_from_entity`, so the stored shape always matches the
//! Rust struct definitions without manual SQL. Connection failure is not
//! fatal to the application - callers degrade to local-only mode.

use crate::entities::{Order, Session, Setting, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the remote store.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all collection tables from the entity definitions.
///
/// Idempotent in practice: each statement carries `IF NOT EXISTS`, so calling
/// this on every boot is safe.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let order_table = schema.create_table_from_entity(Order).if_not_exists().take();
    let session_table = schema
        .create_table_from_entity(Session)
        .if_not_exists()
        .take();
    let user_table = schema.create_table_from_entity(User).if_not_exists().take();
    let setting_table = schema
        .create_table_from_entity(Setting)
        .if_not_exists()
        .take();

    db.execute(builder.build(&order_table)).await?;
    db.execute(builder.build(&session_table)).await?;
    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&setting_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        order::Model as OrderModel, session::Model as SessionModel,
        setting::Model as SettingModel, user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _: Vec<SessionModel> = Session::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<SettingModel> = Setting::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        Ok(())
    }
}
