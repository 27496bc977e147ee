use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A processed-payment ledger row. `paystack_reference` is unique, which is
/// what makes payment verification idempotent.
#[derive(Debug, Clone, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub paystack_reference: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
