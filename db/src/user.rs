use chrono::{DateTime, Utc};
use common::error::{AppError, Res, is_unique_violation};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::user::UserCreateRequest, models::user::User};

pub async fn exists_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Inserts a new user. A concurrent insert of the same email loses the race
/// on the unique constraint and comes back as `Conflict`.
pub async fn insert_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: UserCreateRequest,
) -> Res<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, account_type, name)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(data.account_type)
    .bind(&data.name)
    .fetch_one(executor)
    .await
    .map_err(|error| {
        if is_unique_violation(&error) {
            AppError::Conflict("An account with this email already exists".to_string())
        } else {
            AppError::from(error)
        }
    })
}

pub async fn update_subscription_expiry<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET subscription_expires_at = $2
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(expires_at)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn all_users<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}
