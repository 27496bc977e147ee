use common::error::{AppError, Res, is_unique_violation};
use sqlx::{Executor, Postgres};

use crate::{dtos::payment::PaymentCreateRequest, models::payment::Payment};

pub async fn exists_payment_by_reference<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    reference: &str,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM payments WHERE paystack_reference = $1)",
    )
    .bind(reference)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Records a processed payment. The unique constraint on
/// `paystack_reference` rejects replays that slipped past the
/// exists-check, surfacing them as `Conflict`.
pub async fn insert_payment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PaymentCreateRequest,
) -> Res<Payment> {
    sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (user_id, paystack_reference, amount, currency, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(&data.paystack_reference)
    .bind(data.amount)
    .bind(&data.currency)
    .bind(&data.status)
    .fetch_one(executor)
    .await
    .map_err(|error| {
        if is_unique_violation(&error) {
            AppError::Conflict(format!(
                "Payment reference {} has already been processed",
                data.paystack_reference
            ))
        } else {
            AppError::from(error)
        }
    })
}
