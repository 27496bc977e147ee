use common::{
    error::{AppError, Res, is_unique_violation},
    misc::AccountType,
};
use sqlx::{Executor, Postgres};

use crate::{
    dtos::code::NewCode,
    models::code::{Code, CodeSetDigest},
};

pub async fn insert_code<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    code: &NewCode,
) -> Res<()> {
    sqlx::query("INSERT INTO codes (code_string, account_type) VALUES ($1, $2)")
        .bind(&code.code_string)
        .bind(code.account_type)
        .execute(executor)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                AppError::Conflict(format!("Code {} already exists", code.code_string))
            } else {
                AppError::from(error)
            }
        })?;
    Ok(())
}

/// Oldest unbought code for the given role, or `None` when the pool for that
/// role is empty. Read-only; claiming happens in `claim_code`.
pub async fn find_unbought_code<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    account_type: AccountType,
) -> Res<Option<Code>> {
    sqlx::query_as::<_, Code>(
        r#"
        SELECT * FROM codes
        WHERE account_type = $1 AND is_bought = FALSE
        ORDER BY created_at
        LIMIT 1
        "#,
    )
    .bind(account_type)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

/// Atomically flips one code from unbought to bought. The `is_bought = FALSE`
/// guard in the predicate is what makes two concurrent claims of the same
/// code resolve to a single winner; the loser gets `None` back.
pub async fn claim_code<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    code_string: &str,
) -> Res<Option<Code>> {
    sqlx::query_as::<_, Code>(
        r#"
        UPDATE codes
        SET is_bought = TRUE, bought_at = NOW()
        WHERE code_string = $1 AND is_bought = FALSE
        RETURNING *
        "#,
    )
    .bind(code_string)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn code_set_digest<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<CodeSetDigest> {
    sqlx::query_as::<_, CodeSetDigest>(
        r#"
        SELECT COUNT(*) AS total,
               COALESCE(md5(string_agg(code_string, ',' ORDER BY code_string)), '') AS hash
        FROM codes
        "#,
    )
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn all_code_strings<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT code_string FROM codes ORDER BY code_string")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}
