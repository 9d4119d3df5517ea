//! Store daemon entry point: boots the state store, rehydrates the local
//! snapshot, seeds the session calendar and keeps the remote mirror running.

use chrono::Utc;
use dotenvy::dotenv;
use orderdesk::config;
use orderdesk::core::accounts;
use orderdesk::email::EmailService;
use orderdesk::errors::Result;
use orderdesk::store::{Remote, Store, snapshot, sync};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Load application configuration and the session calendar
    let app_config = config::app::load_app_configuration();
    let seed = config::sessions::load_default_config().unwrap_or_else(|e| {
        warn!("no session calendar loaded: {e}");
        config::sessions::SeedConfig { sessions: vec![] }
    });
    let now = Utc::now();
    let default_sessions: Vec<_> = seed
        .sessions
        .into_iter()
        .map(|s| s.into_model(now))
        .collect();

    // 4. Connect the remote store; failure means local-only mode, not exit
    let remote = match config::database::create_connection(&app_config.database_url).await {
        Ok(db) => match config::database::create_tables(&db).await {
            Ok(()) => {
                let remote = Remote::new(db);
                remote
                    .seed_sessions(default_sessions.clone())
                    .await
                    .inspect_err(|e| error!("session seeding failed: {e}"))?;
                info!("remote store connected");
                Some(remote)
            }
            Err(e) => {
                warn!("remote schema setup failed, running local-only: {e}");
                None
            }
        },
        Err(e) => {
            warn!("remote store unreachable, running local-only: {e}");
            None
        }
    };

    // 5. Build the store and rehydrate the local snapshot before mirroring
    let email = EmailService::from_config(app_config.email_webhook_url.clone());
    let store = Arc::new(Store::new(
        remote,
        Some(app_config.snapshot_path.clone()),
        email,
    ));
    let snap = snapshot::load(&app_config.snapshot_path).unwrap_or_default();
    store.hydrate(snap, default_sessions).await;
    info!("local state rehydrated");

    // 6. Bootstrap the admin password hash if none is stored yet
    if let Some(password) = &app_config.admin_password {
        accounts::bootstrap_admin_password(&store, password, Utc::now()).await?;
    }

    // 7. Run the mirror loop
    info!(
        "orderdesk ready; mirroring every {:?}",
        app_config.sync_interval
    );
    sync::run(Arc::clone(&store), app_config.sync_interval).await;
    Ok(())
}
