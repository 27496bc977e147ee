use chrono::{DateTime, Duration, Utc};
use common::{
    error::{AppError, Res},
    paystack::TransactionData,
};
use db::{Stores, dtos::payment::PaymentCreateRequest, models::user::User};
use uuid::Uuid;

use crate::dtos::pay::SubscriptionExtension;

/// New expiry after a verified payment: `days` on top of the current expiry
/// while the subscription is still running, or on top of now when it has
/// lapsed (or never existed). Paying early never loses the remaining time,
/// and paying late never backdates.
pub fn extended_expiry(
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    days: i64,
) -> DateTime<Utc> {
    let base = match current {
        Some(expires_at) if expires_at > now => expires_at,
        _ => now,
    };
    base + Duration::days(days)
}

/// Applies a verified Paystack transaction to a user's subscription.
///
/// The payment reference is checked against the ledger up front and inserted
/// into it in the same transaction that moves the expiry, so a reference
/// extends a subscription exactly once no matter how often it is replayed;
/// replays come back as `Conflict`.
pub async fn extend_subscription(
    stores: &Stores,
    user_id: Uuid,
    transaction: &TransactionData,
    days: i64,
) -> Res<SubscriptionExtension> {
    let online = &stores.online;

    if db::payment::exists_payment_by_reference(online, &transaction.reference).await? {
        return Err(AppError::Conflict(format!(
            "Payment reference {} has already been processed",
            transaction.reference
        )));
    }

    let user = db::user::get_user_by_id(online, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let new_expiry = extended_expiry(user.subscription_expires_at, Utc::now(), days);

    let mut tx = online.begin().await?;
    let updated: User = db::user::update_subscription_expiry(&mut *tx, user_id, new_expiry)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    db::payment::insert_payment(
        &mut *tx,
        PaymentCreateRequest {
            user_id,
            paystack_reference: transaction.reference.clone(),
            amount: transaction.amount,
            currency: transaction.currency.clone(),
            status: transaction.status.clone(),
        },
    )
    .await?;
    tx.commit().await?;

    log::info!(
        "Extended subscription of user {} by {} days to {} (reference {})",
        updated.email,
        days,
        new_expiry,
        transaction.reference
    );
    sync::spawn_sync_user(stores.offline.clone(), updated);

    Ok(SubscriptionExtension {
        expires_at: new_expiry,
        days_added: days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-02-01T09:30:00Z".parse().unwrap()
    }

    #[test]
    fn first_payment_starts_from_now() {
        let expiry = extended_expiry(None, now(), 30);
        assert_eq!(expiry, now() + Duration::days(30));
    }

    #[test]
    fn active_subscription_stacks_on_the_current_expiry() {
        let current = now() + Duration::days(10);
        let expiry = extended_expiry(Some(current), now(), 30);
        assert_eq!(expiry, current + Duration::days(30));
    }

    #[test]
    fn lapsed_subscription_restarts_from_now() {
        let lapsed = now() - Duration::days(90);
        let expiry = extended_expiry(Some(lapsed), now(), 30);
        assert_eq!(expiry, now() + Duration::days(30));
    }

    #[test]
    fn expiry_exactly_at_now_restarts_from_now() {
        let expiry = extended_expiry(Some(now()), now(), 7);
        assert_eq!(expiry, now() + Duration::days(7));
    }
}
