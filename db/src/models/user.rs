use chrono::{DateTime, Utc};
use common::misc::AccountType;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the online `users` table. Carries the password hash, so it is
/// never serialized directly; responses go through `UserResponse`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub account_type: AccountType,
    pub name: Option<String>,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A row from the offline `users` replica. No credentials, the offline store
/// never authenticates anyone; `updated_at` tracks the last sync touch.
#[derive(Debug, Clone, FromRow)]
pub struct ReplicaUser {
    pub id: Uuid,
    pub email: String,
    pub account_type: AccountType,
    pub name: Option<String>,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
