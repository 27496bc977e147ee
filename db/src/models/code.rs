use chrono::{DateTime, Utc};
use common::misc::AccountType;
use serde::Serialize;
use sqlx::FromRow;

/// A redemption code row. Identical shape in both stores; `code_string` is
/// the primary key.
#[derive(Debug, Clone, FromRow)]
pub struct Code {
    pub code_string: String,
    pub account_type: AccountType,
    pub is_bought: bool,
    pub bought_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Cheap fingerprint of one store's code set: row count plus an md5 over the
/// sorted code strings. Two stores with equal digests hold the same codes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CodeSetDigest {
    pub total: i64,
    pub hash: String,
}
