use common::{
    error::{AppError, Res},
    misc::AccountType,
};
use db::models::code::Code;
use sqlx::PgPool;

/// How many times a redemption retries after losing a claim race before
/// giving up with `Conflict`.
const CLAIM_ATTEMPTS: usize = 3;

/// Claims the oldest unbought code for the given role from the online store.
///
/// Selection and claim are two statements, so another request can buy the
/// candidate in between; the conditional `UPDATE` in `claim_code` detects
/// that and the claim is retried with the next candidate. A code is never
/// handed out twice.
pub async fn redeem_code(pool: &PgPool, account_type: AccountType) -> Res<Code> {
    for attempt in 1..=CLAIM_ATTEMPTS {
        let Some(candidate) = db::codes::find_unbought_code(pool, account_type).await? else {
            return Err(AppError::Unavailable(format!(
                "No unused {} codes are available",
                account_type
            )));
        };

        match db::codes::claim_code(pool, &candidate.code_string).await? {
            Some(claimed) => {
                log::info!(
                    "Code {} redeemed for account type {}",
                    claimed.code_string,
                    claimed.account_type
                );
                return Ok(claimed);
            }
            None => {
                log::warn!(
                    "Code {} was claimed concurrently (attempt {}/{}), trying the next one",
                    candidate.code_string,
                    attempt,
                    CLAIM_ATTEMPTS
                );
            }
        }
    }

    Err(AppError::Conflict(
        "Could not claim a code after repeated attempts, please retry".to_string(),
    ))
}
