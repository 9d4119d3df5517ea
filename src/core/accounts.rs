//! Account registration, login and admin authentication.
//!
//! Login emails match case-insensitively; passwords are Argon2id hashes
//! verified in constant time. Admin access is a single shared password whose
//! hash lives in the global-resources document - verification grants nothing
//! durable, the caller holds the result for its own session only.

use crate::email::registration_email;
use crate::entities::user::{self, Withdrawals};
use crate::entities::setting;
use crate::errors::{Error, Result};
use crate::password::{hash_password, verify_password};
use crate::store::{Severity, Store};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Creates an account and signs it in.
///
/// The email must be unused (case-insensitively). A registration email goes
/// out best-effort.
pub async fn register_user(
    store: &Store,
    name: &str,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Name cannot be empty".to_string(),
        });
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(Error::Config {
            message: "A valid email is required".to_string(),
        });
    }

    let password_hash = hash_password(password)?;
    let now = Utc::now();
    let user = {
        let mut state = store.state.write().await;
        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(Error::EmailTaken {
                email: email.to_string(),
            });
        }

        let user = user::Model {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            registered_at: now,
            is_ambassador: false,
            ambassador_code: None,
            balance: 0,
            withdrawals: Withdrawals::default(),
            updated_at: now,
        };
        state.users.push(user.clone());
        state.current_user = Some(user.id.clone());
        user
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_user(&user).await {
            warn!(user = %user.id, error = %e, "registration not mirrored");
        }
    }
    store.email.send_silently(&registration_email(&user)).await;
    store.notify("Profile created!", Severity::Success);
    Ok(user)
}

/// Signs a user in by email and password.
pub async fn login(store: &Store, email: &str, password: &str) -> Result<user::Model> {
    let user = {
        let state = store.state.read().await;
        state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or(Error::InvalidCredentials)?
    };

    if !verify_password(password, &user.password_hash)? {
        return Err(Error::InvalidCredentials);
    }

    {
        let mut state = store.state.write().await;
        state.current_user = Some(user.id.clone());
    }
    store.persist().await;
    store.notify("Good to see you again!", Severity::Success);
    Ok(user)
}

/// Signs the current user out.
pub async fn logout(store: &Store) {
    {
        let mut state = store.state.write().await;
        state.current_user = None;
    }
    store.persist().await;
}

/// The signed-in user, if any.
pub async fn current_user(store: &Store) -> Option<user::Model> {
    let state = store.state.read().await;
    let id = state.current_user.as_deref()?;
    state.users.iter().find(|u| u.id == id).cloned()
}

/// Checks an admin password attempt against the stored hash.
///
/// Returns `Ok(false)` when no hash has been bootstrapped yet - admin access
/// stays closed rather than open by default.
pub async fn verify_admin_password(store: &Store, input: &str) -> Result<bool> {
    let hash = {
        let state = store.state.read().await;
        state
            .resources
            .as_ref()
            .and_then(|r| r.admin_password_hash.clone())
    };
    match hash {
        Some(hash) => verify_password(input, &hash),
        None => Ok(false),
    }
}

/// Replaces the admin password.
pub async fn set_admin_password(store: &Store, new_password: &str, now: DateTime<Utc>) -> Result<()> {
    let hash = hash_password(new_password)?;
    let updated = {
        let mut state = store.state.write().await;
        let resources = state
            .resources
            .get_or_insert_with(|| setting::Model::global(now));
        resources.admin_password_hash = Some(hash);
        resources.updated_at = now;
        resources.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_settings(&updated).await {
            warn!(error = %e, "admin password change not mirrored");
        }
    }
    Ok(())
}

/// One-time admin password setup at boot: hashes and stores the configured
/// password only when no hash exists yet, so a remote-managed password is
/// never overwritten by a stale environment value.
pub async fn bootstrap_admin_password(
    store: &Store,
    password: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let already_set = {
        let state = store.state.read().await;
        state
            .resources
            .as_ref()
            .is_some_and(|r| r.admin_password_hash.is_some())
    };
    if already_set {
        return Ok(());
    }
    set_admin_password(store, password, now).await
}

/// The editable link fields of the global-resources document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLinks {
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
}

/// Saves the global resource links. The admin password hash is untouched -
/// it changes only through [`set_admin_password`].
pub async fn save_resources(
    store: &Store,
    links: ResourceLinks,
    now: DateTime<Utc>,
) -> Result<setting::Model> {
    let updated = {
        let mut state = store.state.write().await;
        let resources = state
            .resources
            .get_or_insert_with(|| setting::Model::global(now));
        resources.enrollment_form_url = links.enrollment_form_url;
        resources.contract_url = links.contract_url;
        resources.course_content_url = links.course_content_url;
        resources.support_chat_link = links.support_chat_link;
        resources.editor_guide_url = links.editor_guide_url;
        resources.updated_at = now;
        resources.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_settings(&updated).await {
            warn!(error = %e, "resource links not mirrored");
        }
    }
    store.notify("Settings saved.", Severity::Success);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::offline_store;

    #[tokio::test]
    async fn test_register_signs_in_and_starts_clean() {
        let store = offline_store();
        let user = register_user(&store, "Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();

        assert!(!user.is_ambassador);
        assert_eq!(user.balance, 0);
        assert_ne!(user.password_hash, "hunter2");

        let current = current_user(&store).await.unwrap();
        assert_eq!(current.id, user.id);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_case_insensitively() {
        let store = offline_store();
        register_user(&store, "Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();

        let err = register_user(&store, "Imposter", "ADA@example.com", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmailTaken { .. }));
    }

    #[tokio::test]
    async fn test_register_validates_inputs() {
        let store = offline_store();
        assert!(register_user(&store, "  ", "a@b.c", "pw").await.is_err());
        assert!(register_user(&store, "Ada", "not-an-email", "pw").await.is_err());
    }

    #[tokio::test]
    async fn test_login_matches_email_case_insensitively() {
        let store = offline_store();
        register_user(&store, "Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();
        logout(&store).await;
        assert!(current_user(&store).await.is_none());

        let user = login(&store, "ADA@EXAMPLE.COM", "hunter2").await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert!(current_user(&store).await.is_some());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password_and_unknown_email() {
        let store = offline_store();
        register_user(&store, "Ada", "ada@example.com", "hunter2")
            .await
            .unwrap();

        let err = login(&store, "ada@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));

        let err = login(&store, "ghost@example.com", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_admin_access_closed_until_bootstrapped() {
        let store = offline_store();
        assert!(!verify_admin_password(&store, "anything").await.unwrap());

        bootstrap_admin_password(&store, "ever higher", Utc::now())
            .await
            .unwrap();
        assert!(verify_admin_password(&store, "ever higher").await.unwrap());
        assert!(!verify_admin_password(&store, "something else").await.unwrap());
    }

    #[tokio::test]
    async fn test_bootstrap_does_not_overwrite_existing_hash() {
        let store = offline_store();
        set_admin_password(&store, "managed remotely", Utc::now())
            .await
            .unwrap();

        bootstrap_admin_password(&store, "stale env value", Utc::now())
            .await
            .unwrap();
        assert!(verify_admin_password(&store, "managed remotely").await.unwrap());
        assert!(!verify_admin_password(&store, "stale env value").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_resources_keeps_admin_hash() {
        let store = offline_store();
        set_admin_password(&store, "ever higher", Utc::now())
            .await
            .unwrap();

        let updated = save_resources(
            &store,
            ResourceLinks {
                support_chat_link: Some("https://chat.example/support".to_string()),
                ..ResourceLinks::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();

        assert_eq!(
            updated.support_chat_link.as_deref(),
            Some("https://chat.example/support")
        );
        assert!(updated.admin_password_hash.is_some());
        assert!(verify_admin_password(&store, "ever higher").await.unwrap());
    }
}
