use common::misc::AccountType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateBatchRequest {
    #[serde(default)]
    pub users: i64,
    #[serde(default)]
    pub creators: i64,
}

#[derive(Debug, Serialize)]
pub struct GenerateBatchResponse {
    pub message: String,
    pub users: i64,
    pub creators: i64,
}

/// Counts of codes actually written to both stores.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub users: i64,
    pub creators: i64,
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub account_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub code: String,
    pub account_type: AccountType,
}
