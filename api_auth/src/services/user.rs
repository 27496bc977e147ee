use chrono::{DateTime, Utc};
use common::{
    error::{AppError, Res},
    misc::{AccountType, normalize_email},
};
use db::{Stores, dtos::user::UserCreateRequest, models::user::User};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::auth::RegisterRequest,
    dtos::user::{SubscriptionOverview, SubscriptionStatus, TimeRemaining},
    services,
};

pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Res<User> {
    db::user::get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Res<User> {
    db::user::get_user_by_email(pool, email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Registers a new account in the online store and kicks off a background
/// sync of the fresh row into the offline replica. The response never waits
/// on the offline store.
///
/// # Arguments
///
/// * `stores` - Handles to the online and offline databases.
/// * `req` - The registration data.
///
/// # Returns
///
/// A `Result` containing the created `User` or an `AppError` if an error occurs.
pub async fn register_user(stores: &Stores, req: &RegisterRequest) -> Res<User> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }
    let account_type = AccountType::from_str(&req.account_type)?;

    if db::user::exists_user_by_email(&stores.online, &email).await? {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let password_hash = services::auth::hash_password(&req.password)?;
    let user = db::user::insert_user(
        &stores.online,
        UserCreateRequest {
            email,
            password_hash,
            account_type,
            name: req.name.clone(),
        },
    )
    .await?;

    log::info!("Registered new {} account {}", user.account_type, user.email);
    sync::spawn_sync_user(stores.offline.clone(), user.clone());

    Ok(user)
}

/// Digests a user's expiry timestamp into the dashboard subscription block.
/// Mirrors what the access check does: access exists strictly before
/// `expires_at`, and an account with no timestamp has never subscribed.
pub fn subscription_overview(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> SubscriptionOverview {
    match expires_at {
        None => SubscriptionOverview {
            has_active_subscription: false,
            expires_at: None,
            time_remaining: None,
            days_remaining: None,
            status: SubscriptionStatus::NeverSubscribed,
        },
        Some(when) if when > now => {
            let remaining = when - now;
            let days_remaining = ceil_days(remaining.num_seconds());

            SubscriptionOverview {
                has_active_subscription: true,
                expires_at: Some(when),
                time_remaining: Some(TimeRemaining {
                    days: remaining.num_days(),
                    hours: remaining.num_hours() % 24,
                    minutes: remaining.num_minutes() % 60,
                    total_days: days_remaining,
                }),
                days_remaining: Some(days_remaining),
                status: SubscriptionStatus::Active,
            }
        }
        Some(when) => SubscriptionOverview {
            has_active_subscription: false,
            expires_at: Some(when),
            time_remaining: None,
            days_remaining: None,
            status: SubscriptionStatus::Expired,
        },
    }
}

fn ceil_days(seconds: i64) -> i64 {
    (seconds + 86_399) / 86_400
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2026-01-10T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn no_expiry_means_never_subscribed() {
        let overview = subscription_overview(None, now());
        assert!(!overview.has_active_subscription);
        assert_eq!(overview.status, SubscriptionStatus::NeverSubscribed);
        assert!(overview.expires_at.is_none());
        assert!(overview.time_remaining.is_none());
        assert!(overview.days_remaining.is_none());
    }

    #[test]
    fn past_expiry_means_expired_but_keeps_the_timestamp() {
        let expired_at = now() - Duration::days(3);
        let overview = subscription_overview(Some(expired_at), now());
        assert!(!overview.has_active_subscription);
        assert_eq!(overview.status, SubscriptionStatus::Expired);
        assert_eq!(overview.expires_at, Some(expired_at));
        assert!(overview.time_remaining.is_none());
    }

    #[test]
    fn expiry_equal_to_now_is_already_expired() {
        let overview = subscription_overview(Some(now()), now());
        assert!(!overview.has_active_subscription);
        assert_eq!(overview.status, SubscriptionStatus::Expired);
    }

    #[test]
    fn active_subscription_breaks_down_remaining_time() {
        let expires_at = now() + Duration::days(30) + Duration::hours(5) + Duration::minutes(20);
        let overview = subscription_overview(Some(expires_at), now());

        assert!(overview.has_active_subscription);
        assert_eq!(overview.status, SubscriptionStatus::Active);

        let remaining = overview.time_remaining.unwrap();
        assert_eq!(remaining.days, 30);
        assert_eq!(remaining.hours, 5);
        assert_eq!(remaining.minutes, 20);
        // Partial days round up.
        assert_eq!(remaining.total_days, 31);
        assert_eq!(overview.days_remaining, Some(31));
    }

    #[test]
    fn whole_day_remainder_does_not_round_up() {
        let expires_at = now() + Duration::days(7);
        let overview = subscription_overview(Some(expires_at), now());

        let remaining = overview.time_remaining.unwrap();
        assert_eq!(remaining.days, 7);
        assert_eq!(remaining.hours, 0);
        assert_eq!(remaining.minutes, 0);
        assert_eq!(remaining.total_days, 7);
    }

    #[test]
    fn final_hour_still_counts_as_one_day() {
        let expires_at = now() + Duration::minutes(59);
        let overview = subscription_overview(Some(expires_at), now());

        assert_eq!(overview.days_remaining, Some(1));
        let remaining = overview.time_remaining.unwrap();
        assert_eq!(remaining.days, 0);
        assert_eq!(remaining.minutes, 59);
    }
}
