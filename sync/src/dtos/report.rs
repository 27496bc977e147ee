use db::models::code::CodeSetDigest;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub success_count: i64,
    pub fail_count: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergenceReport {
    pub divergent: bool,
    pub online: CodeSetDigest,
    pub offline: CodeSetDigest,
    /// Codes the offline store has that the online store lacks (capped).
    pub missing_online: Vec<String>,
    /// Codes the online store has that the offline store lacks (capped).
    pub missing_offline: Vec<String>,
}
