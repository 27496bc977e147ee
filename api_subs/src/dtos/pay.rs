use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub reference: String,
}

/// What a verified payment did to the subscription.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionExtension {
    pub expires_at: DateTime<Utc>,
    pub days_added: i64,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub subscription: SubscriptionExtension,
}
