use common::{
    error::{AppError, Res},
    misc::AccountType,
};
use db::{Stores, dtos::code::NewCode};
use sqlx::{Postgres, Transaction};

use crate::{dtos::codes::BatchSummary, services::gen};

/// Generates a batch of codes and writes every one of them to both stores.
///
/// Each store gets its own transaction and the batch only counts as written
/// once both commit. Any failure before the first commit rolls both back and
/// nothing is kept. The offline store commits first; if the online commit
/// then fails, the stores have diverged and the call reports `PartialWrite`
/// after logging every affected code.
pub async fn generate_batch(stores: &Stores, users: i64, creators: i64) -> Res<BatchSummary> {
    generate_batch_with(stores, users, creators, gen::generate_code).await
}

/// Coordinator core, parameterized over the code source so tests can inject
/// colliding or otherwise failing codes.
pub async fn generate_batch_with<F>(
    stores: &Stores,
    users: i64,
    creators: i64,
    mut next_code: F,
) -> Res<BatchSummary>
where
    F: FnMut(AccountType) -> NewCode,
{
    validate_count(users, "users")?;
    validate_count(creators, "creators")?;

    let mut online_tx = stores.online.begin().await?;
    let mut offline_tx = stores.offline.begin().await?;

    let mut inserted: Vec<NewCode> = Vec::with_capacity((users + creators) as usize);
    let written = async {
        for _ in 0..users {
            let code = next_code(AccountType::User);
            db::codes::insert_code(&mut *online_tx, &code).await?;
            db::codes::insert_code(&mut *offline_tx, &code).await?;
            inserted.push(code);
        }
        for _ in 0..creators {
            let code = next_code(AccountType::Creator);
            db::codes::insert_code(&mut *online_tx, &code).await?;
            db::codes::insert_code(&mut *offline_tx, &code).await?;
            inserted.push(code);
        }
        Ok::<(), AppError>(())
    }
    .await;

    if let Err(error) = written {
        rollback_both(online_tx, offline_tx).await;
        return Err(error);
    }

    // Commit order matters: offline first. A failure here still leaves both
    // stores untouched because the online transaction gets rolled back.
    if let Err(error) = offline_tx.commit().await {
        if let Err(rollback_error) = online_tx.rollback().await {
            log::error!(
                "Rollback of online store failed after offline commit error: {}",
                rollback_error
            );
        }
        return Err(AppError::from(error));
    }

    if let Err(error) = online_tx.commit().await {
        // The offline store already holds the batch. Log every code so the
        // online store can be reconciled by hand.
        let codes: Vec<&str> = inserted
            .iter()
            .map(|code| code.code_string.as_str())
            .collect();
        log::error!(
            "Batch diverged: offline store committed {} codes but online commit failed ({}). Codes present offline only: [{}]",
            inserted.len(),
            error,
            codes.join(", ")
        );
        return Err(AppError::PartialWrite(format!(
            "offline store committed {} codes that the online store did not",
            inserted.len()
        )));
    }

    log::info!(
        "Generated {} USER codes and {} CREATOR codes in both stores",
        users,
        creators
    );

    Ok(BatchSummary { users, creators })
}

async fn rollback_both(
    online_tx: Transaction<'static, Postgres>,
    offline_tx: Transaction<'static, Postgres>,
) {
    if let Err(error) = offline_tx.rollback().await {
        log::error!("Rollback of offline store failed: {}", error);
    }
    if let Err(error) = online_tx.rollback().await {
        log::error!("Rollback of online store failed: {}", error);
    }
}

fn validate_count(value: i64, field: &str) -> Res<()> {
    if value < 0 {
        return Err(AppError::BadRequest(format!(
            "{} must be zero or greater",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_counts_are_rejected() {
        assert!(matches!(
            validate_count(-1, "users"),
            Err(AppError::BadRequest(_))
        ));
        assert!(validate_count(0, "users").is_ok());
        assert!(validate_count(500, "creators").is_ok());
    }
}
