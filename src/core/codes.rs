//! Access codes - timed keys to delivered resources.
//!
//! Approval attaches a code built from a fixed prefix and eight characters of
//! an unambiguous alphabet (no I, O, 0 or 1, so a code read over the phone
//! cannot be mistyped). Codes expire 48 hours after issue; redemption always
//! compares against a caller-supplied clock so tests control time.

use crate::entities::order::{self, OrderStatus};
use crate::errors::{Error, Result};
use crate::store::Store;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Prefix every access code starts with.
pub const CODE_PREFIX: &str = "OD-";
/// Number of random characters after the prefix.
pub const CODE_LEN: usize = 8;
/// Characters a code may contain; visually similar ones are excluded.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// How long a code stays valid after issue.
pub const CODE_TTL_HOURS: i64 = 48;

/// Generates a fresh access code.
#[must_use]
pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(CODE_PREFIX.len() + CODE_LEN);
    code.push_str(CODE_PREFIX);
    for _ in 0..CODE_LEN {
        let idx = rng.gen_range(0..CODE_ALPHABET.len());
        code.push(CODE_ALPHABET[idx] as char);
    }
    code
}

/// Whether a string has the shape of an access code.
#[must_use]
pub fn is_well_formed(code: &str) -> bool {
    code.strip_prefix(CODE_PREFIX).is_some_and(|rest| {
        rest.len() == CODE_LEN && rest.bytes().all(|b| CODE_ALPHABET.contains(&b))
    })
}

/// Expiry timestamp for a code issued at `now`.
#[must_use]
pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(CODE_TTL_HOURS)
}

/// Exchanges a code for the approved order it unlocks.
///
/// Input is trimmed and uppercased before matching. Only approved orders are
/// searched; an expired code is reported distinctly from an unknown one so
/// the caller can word the refusal.
pub async fn redeem_code(store: &Store, input: &str, now: DateTime<Utc>) -> Result<order::Model> {
    let code = input.trim().to_uppercase();
    let state = store.state.read().await;
    let order = state
        .orders
        .iter()
        .find(|o| o.status == OrderStatus::Approved && o.code.as_deref() == Some(code.as_str()))
        .ok_or(Error::CodeInvalid)?;

    if let Some(expires_at) = order.code_expires_at {
        if now > expires_at {
            return Err(Error::CodeExpired);
        }
    }
    Ok(order.clone())
}

/// Time left before a code expires, `None` once it has.
#[must_use]
pub fn time_remaining(order: &order::Model, now: DateTime<Utc>) -> Option<Duration> {
    let expires_at = order.code_expires_at?;
    (now < expires_at).then(|| expires_at - now)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::orders::{OrderDraft, create_order, set_status};
    use crate::test_utils::{offline_store, test_customer, test_item};

    #[test]
    fn test_generated_codes_are_well_formed() {
        for _ in 0..100 {
            let code = generate_access_code();
            assert!(is_well_formed(&code), "bad code: {code}");
        }
    }

    #[test]
    fn test_is_well_formed_rejects_ambiguous_characters() {
        assert!(!is_well_formed("OD-ABCDEFG1"));
        assert!(!is_well_formed("OD-ABCDEFGO"));
        assert!(!is_well_formed("OD-ABCDEFG"));
        assert!(!is_well_formed("XX-ABCDEFGH"));
        assert!(is_well_formed("OD-ABCDEFGH"));
    }

    #[tokio::test]
    async fn test_redeem_is_case_insensitive_and_trims() {
        let store = offline_store();
        let order = create_order(
            &store,
            OrderDraft {
                customer: test_customer(),
                items: vec![test_item()],
                amount: 5000,
                coupon_code: None,
                referrer_id: None,
            },
        )
        .await
        .unwrap();

        let now = Utc::now();
        let approved = set_status(&store, &order.id, OrderStatus::Approved, now)
            .await
            .unwrap();
        let code = approved.code.unwrap();

        let unlocked = redeem_code(&store, &format!("  {}  ", code.to_lowercase()), now)
            .await
            .unwrap();
        assert_eq!(unlocked.id, order.id);
    }

    #[tokio::test]
    async fn test_redeem_rejects_expired_code() {
        let store = offline_store();
        let order = create_order(
            &store,
            OrderDraft {
                customer: test_customer(),
                items: vec![test_item()],
                amount: 5000,
                coupon_code: None,
                referrer_id: None,
            },
        )
        .await
        .unwrap();

        let issued = Utc::now();
        let approved = set_status(&store, &order.id, OrderStatus::Approved, issued)
            .await
            .unwrap();
        let code = approved.code.unwrap();

        let just_before = issued + Duration::hours(CODE_TTL_HOURS) - Duration::seconds(1);
        assert!(redeem_code(&store, &code, just_before).await.is_ok());

        let just_after = issued + Duration::hours(CODE_TTL_HOURS) + Duration::seconds(1);
        let err = redeem_code(&store, &code, just_after).await.unwrap_err();
        assert!(matches!(err, Error::CodeExpired));
    }

    #[tokio::test]
    async fn test_redeem_rejects_pending_orders() {
        let store = offline_store();
        create_order(
            &store,
            OrderDraft {
                customer: test_customer(),
                items: vec![test_item()],
                amount: 5000,
                coupon_code: None,
                referrer_id: None,
            },
        )
        .await
        .unwrap();

        let err = redeem_code(&store, "OD-ABCDEFGH", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CodeInvalid));
    }

    #[test]
    fn test_time_remaining_counts_down() {
        let mut order = crate::test_utils::test_order();
        let now = Utc::now();
        order.code_expires_at = Some(now + Duration::hours(2));

        let left = time_remaining(&order, now).unwrap();
        assert_eq!(left, Duration::hours(2));

        assert!(time_remaining(&order, now + Duration::hours(3)).is_none());
    }
}
