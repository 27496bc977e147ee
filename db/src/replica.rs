use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::user::{ReplicaUser, User};

pub async fn exists_replica_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_replica_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<ReplicaUser>> {
    sqlx::query_as::<_, ReplicaUser>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Inserts a user into the replica, keeping the id and `created_at` from the
/// online row so both stores describe the account identically.
pub async fn insert_replica_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user: &User,
) -> Res<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, account_type, name, subscription_expires_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(user.account_type)
    .bind(&user.name)
    .bind(user.subscription_expires_at)
    .bind(user.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn update_replica_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user: &User,
) -> Res<u64> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET email = $2,
            account_type = $3,
            name = $4,
            subscription_expires_at = $5,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(user.account_type)
    .bind(&user.name)
    .bind(user.subscription_expires_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
