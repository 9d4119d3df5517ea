//! Coupon verification and the ambassador commission ledger.
//!
//! An ambassador's referral code doubles as a checkout coupon: the customer
//! saves a fixed amount immediately, the ambassador is paid the fixed
//! commission later - only when the order is approved, so rejected orders
//! never pay out. Eligibility is gated by item kind: only carts carrying at
//! least one allow-listed item may apply a coupon at all.

use crate::entities::order::{LineItem, OrderKind};
use crate::entities::user::{self, Withdrawal, WithdrawalStatus};
use crate::errors::{Error, Result};
use crate::store::{Severity, Store};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Flat discount a valid coupon takes off the cart total.
pub const COUPON_DISCOUNT: i64 = 1000;
/// Flat commission credited to the referrer per approved order.
pub const AMBASSADOR_COMMISSION: i64 = 1000;
/// Smallest withdrawal an ambassador may request.
pub const MIN_WITHDRAWAL: i64 = 5000;
/// Item kinds a coupon may be applied against.
pub const ELIGIBLE_KINDS: [OrderKind; 3] =
    [OrderKind::FullProgram, OrderKind::AiPack, OrderKind::Reservation];

/// Outcome of a coupon lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponCheck {
    /// Whether the code matched an active ambassador
    pub valid: bool,
    /// The matched ambassador's user id
    pub referrer_id: Option<String>,
}

/// Looks up a coupon code among active ambassadors, case-insensitively.
pub async fn verify_coupon(store: &Store, code: &str) -> CouponCheck {
    let normalized = code.trim().to_uppercase();
    let state = store.state.read().await;
    let ambassador = state
        .users
        .iter()
        .find(|u| u.is_ambassador && u.ambassador_code.as_deref() == Some(normalized.as_str()));

    match ambassador {
        Some(user) => CouponCheck {
            valid: true,
            referrer_id: Some(user.id.clone()),
        },
        None => CouponCheck {
            valid: false,
            referrer_id: None,
        },
    }
}

/// Whether a cart carries at least one coupon-eligible item.
#[must_use]
pub fn coupon_eligible(items: &[LineItem]) -> bool {
    items.iter().any(|i| ELIGIBLE_KINDS.contains(&i.kind))
}

/// Cart total after the coupon discount, never below zero.
#[must_use]
pub const fn discounted_total(total: i64) -> i64 {
    let discounted = total - COUPON_DISCOUNT;
    if discounted < 0 { 0 } else { discounted }
}

/// Grant produced by a successful coupon application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponGrant {
    /// The normalized coupon code, stored on the order
    pub code: String,
    /// The ambassador to credit on approval
    pub referrer_id: String,
}

/// Validates a coupon against a concrete cart.
///
/// Eligibility is checked before the code itself so an ineligible cart gets
/// the explanatory refusal even when the code is perfectly valid.
pub async fn check_coupon_for_cart(
    store: &Store,
    items: &[LineItem],
    code: &str,
) -> Result<CouponGrant> {
    if !coupon_eligible(items) {
        return Err(Error::CouponNotEligible);
    }
    let check = verify_coupon(store, code).await;
    let normalized = code.trim().to_uppercase();
    match check.referrer_id {
        Some(referrer_id) => Ok(CouponGrant {
            code: normalized,
            referrer_id,
        }),
        None => Err(Error::CouponInvalid { code: normalized }),
    }
}

/// Turns a user into an ambassador with a unique referral code.
///
/// The code is normalized to uppercase and checked against every other
/// ambassador before activation; the commission balance starts at zero.
pub async fn activate_ambassador(
    store: &Store,
    user_id: &str,
    proposed_code: &str,
    now: DateTime<Utc>,
) -> Result<user::Model> {
    let code = proposed_code.trim().to_uppercase();
    let updated = {
        let mut state = store.state.write().await;
        let taken = state
            .users
            .iter()
            .any(|u| u.id != user_id && u.ambassador_code.as_deref() == Some(code.as_str()));
        if taken {
            return Err(Error::AmbassadorCodeTaken { code });
        }

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::UserNotFound {
                id: user_id.to_string(),
            })?;
        user.is_ambassador = true;
        user.ambassador_code = Some(code);
        user.balance = 0;
        user.updated_at = now;
        user.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_user(&updated).await {
            warn!(user = %updated.id, error = %e, "ambassador activation not mirrored");
        }
    }
    store.notify("Ambassador program activated!", Severity::Success);
    Ok(updated)
}

/// Credits the fixed commission to a referrer. Called exclusively from the
/// order approval transition, which is what makes the credit once-per-order.
pub(crate) async fn credit_commission(store: &Store, user_id: &str, now: DateTime<Utc>) {
    let credited = {
        let mut state = store.state.write().await;
        match state.users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.balance += AMBASSADOR_COMMISSION;
                user.updated_at = now;
                true
            }
            None => {
                warn!(user = %user_id, "referrer unknown locally, commission only mirrored remotely");
                false
            }
        }
    };

    if let Some(remote) = &store.remote {
        if let Err(e) = remote
            .credit_balance(user_id, AMBASSADOR_COMMISSION, now)
            .await
        {
            warn!(user = %user_id, error = %e, "commission credit not mirrored");
        }
    } else if !credited {
        warn!(user = %user_id, "commission credit lost: referrer unknown and no remote");
    }
}

/// Records a commission withdrawal request and debits the balance.
pub async fn record_withdrawal(
    store: &Store,
    user_id: &str,
    amount: i64,
    now: DateTime<Utc>,
) -> Result<user::Model> {
    let updated = {
        let mut state = store.state.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::UserNotFound {
                id: user_id.to_string(),
            })?;
        if !user.is_ambassador {
            return Err(Error::NotAmbassador {
                id: user_id.to_string(),
            });
        }
        if amount < MIN_WITHDRAWAL {
            return Err(Error::WithdrawalTooSmall {
                amount,
                minimum: MIN_WITHDRAWAL,
            });
        }
        if amount > user.balance {
            return Err(Error::InsufficientBalance {
                current: user.balance,
                requested: amount,
            });
        }

        user.balance -= amount;
        user.withdrawals.0.push(Withdrawal {
            amount,
            date: now,
            status: WithdrawalStatus::Pending,
        });
        user.updated_at = now;
        user.clone()
    };

    store.persist().await;
    if let Some(remote) = &store.remote {
        if let Err(e) = remote.save_user(&updated).await {
            warn!(user = %updated.id, error = %e, "withdrawal not mirrored");
        }
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{offline_store, registered_user, test_item, test_item_of_kind};

    #[tokio::test]
    async fn test_verify_coupon_is_case_insensitive() {
        let store = offline_store();
        let user = registered_user(&store, "Ada", "ada@example.com").await;
        activate_ambassador(&store, &user.id, "ada-512", Utc::now())
            .await
            .unwrap();

        let check = verify_coupon(&store, "ada-512").await;
        assert!(check.valid);
        assert_eq!(check.referrer_id.as_deref(), Some(user.id.as_str()));

        let check = verify_coupon(&store, "ADA-512").await;
        assert!(check.valid);
    }

    #[tokio::test]
    async fn test_verify_coupon_unknown_code_is_invalid() {
        let store = offline_store();
        let check = verify_coupon(&store, "NOPE-99").await;
        assert!(!check.valid);
        assert!(check.referrer_id.is_none());
    }

    #[tokio::test]
    async fn test_non_ambassador_codes_never_match() {
        let store = offline_store();
        let user = registered_user(&store, "Ada", "ada@example.com").await;
        {
            // A stale code left on a user who never activated must not validate
            let mut state = store.state.write().await;
            let held = state.users.iter_mut().find(|u| u.id == user.id).unwrap();
            held.ambassador_code = Some("ADA-512".to_string());
            held.is_ambassador = false;
        }

        assert!(!verify_coupon(&store, "ADA-512").await.valid);
    }

    #[test]
    fn test_eligibility_requires_an_allow_listed_kind() {
        let service_only = vec![test_item()];
        assert!(!coupon_eligible(&service_only));

        let with_pack = vec![test_item(), test_item_of_kind(OrderKind::AiPack)];
        assert!(coupon_eligible(&with_pack));

        let reservation = vec![test_item_of_kind(OrderKind::Reservation)];
        assert!(coupon_eligible(&reservation));
    }

    #[tokio::test]
    async fn test_valid_code_refused_for_ineligible_cart() {
        let store = offline_store();
        let user = registered_user(&store, "Ada", "ada@example.com").await;
        activate_ambassador(&store, &user.id, "ADA-512", Utc::now())
            .await
            .unwrap();

        let err = check_coupon_for_cart(&store, &[test_item()], "ADA-512")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CouponNotEligible));
    }

    #[tokio::test]
    async fn test_eligible_cart_with_valid_code_is_granted() {
        let store = offline_store();
        let user = registered_user(&store, "Ada", "ada@example.com").await;
        activate_ambassador(&store, &user.id, "ADA-512", Utc::now())
            .await
            .unwrap();

        let grant = check_coupon_for_cart(
            &store,
            &[test_item_of_kind(OrderKind::FullProgram)],
            "ada-512",
        )
        .await
        .unwrap();
        assert_eq!(grant.code, "ADA-512");
        assert_eq!(grant.referrer_id, user.id);
    }

    #[test]
    fn test_discounted_total_saturates_at_zero() {
        assert_eq!(discounted_total(15000), 14000);
        assert_eq!(discounted_total(1000), 0);
        assert_eq!(discounted_total(400), 0);
    }

    #[tokio::test]
    async fn test_ambassador_code_collision_is_rejected() {
        let store = offline_store();
        let first = registered_user(&store, "Ada", "ada@example.com").await;
        let second = registered_user(&store, "Grace", "grace@example.com").await;

        activate_ambassador(&store, &first.id, "SHARED-1", Utc::now())
            .await
            .unwrap();
        let err = activate_ambassador(&store, &second.id, "shared-1", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AmbassadorCodeTaken { .. }));
    }

    #[tokio::test]
    async fn test_reactivation_with_own_code_is_allowed() {
        let store = offline_store();
        let user = registered_user(&store, "Ada", "ada@example.com").await;

        activate_ambassador(&store, &user.id, "ADA-512", Utc::now())
            .await
            .unwrap();
        let again = activate_ambassador(&store, &user.id, "ADA-512", Utc::now())
            .await
            .unwrap();
        assert_eq!(again.ambassador_code.as_deref(), Some("ADA-512"));
    }

    #[tokio::test]
    async fn test_withdrawal_rules() {
        let store = offline_store();
        let user = registered_user(&store, "Ada", "ada@example.com").await;
        activate_ambassador(&store, &user.id, "ADA-512", Utc::now())
            .await
            .unwrap();
        {
            let mut state = store.state.write().await;
            state.users.iter_mut().find(|u| u.id == user.id).unwrap().balance = 6000;
        }

        let err = record_withdrawal(&store, &user.id, 4000, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WithdrawalTooSmall { .. }));

        let err = record_withdrawal(&store, &user.id, 7000, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientBalance { .. }));

        let updated = record_withdrawal(&store, &user.id, 5000, Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.balance, 1000);
        assert_eq!(updated.withdrawals.0.len(), 1);
        assert_eq!(updated.withdrawals.0[0].status, WithdrawalStatus::Pending);
    }
}
