use serde::Deserialize;

use crate::{
    env_config::Config,
    error::{AppError, Res},
};

/// Envelope Paystack wraps every API response in.
/// `status` reports whether the API call itself succeeded; the transaction
/// outcome lives in `data.status`.
#[derive(Debug, Deserialize)]
pub struct VerifyEnvelope {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<TransactionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionData {
    pub status: String,
    pub reference: String,
    /// Amount in the currency's subunit (kobo for NGN).
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
}

impl TransactionData {
    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }
}

/// Calls `GET /transaction/verify/{reference}` on Paystack and returns the
/// transaction if, and only if, Paystack reports it as successful.
///
/// Transport failures, 5xx answers and unparseable bodies surface as
/// `Upstream`; a reachable Paystack that rejects or has not completed the
/// transaction surfaces as `BadRequest`.
pub async fn verify_transaction(config: &Config, reference: &str) -> Res<TransactionData> {
    let url = format!(
        "{}/transaction/verify/{}",
        config.paystack_base_url.trim_end_matches('/'),
        reference
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .bearer_auth(&config.paystack_secret_key)
        .send()
        .await
        .map_err(|error| AppError::Upstream(format!("Failed to reach Paystack: {}", error)))?;

    let status = response.status();
    if status.is_server_error() {
        return Err(AppError::Upstream(format!(
            "Paystack returned {} for reference {}",
            status, reference
        )));
    }

    let envelope: VerifyEnvelope = response.json().await.map_err(|error| {
        AppError::Upstream(format!("Failed to parse Paystack response: {}", error))
    })?;

    if !envelope.status {
        return Err(AppError::BadRequest(format!(
            "Payment could not be verified: {}",
            envelope.message
        )));
    }

    let transaction = envelope.data.ok_or_else(|| {
        AppError::Upstream("Paystack response is missing transaction data".to_string())
    })?;

    if !transaction.is_successful() {
        return Err(AppError::BadRequest(format!(
            "Payment was not successful (status: {})",
            transaction.status
        )));
    }

    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_envelope_deserializes() {
        let body = r#"{
            "status": true,
            "message": "Verification successful",
            "data": {
                "status": "success",
                "reference": "T685312322670591",
                "amount": 500000,
                "currency": "NGN",
                "paid_at": "2024-08-22T10:42:31.000Z",
                "channel": "card"
            }
        }"#;

        let envelope: VerifyEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.status);
        let transaction = envelope.data.unwrap();
        assert!(transaction.is_successful());
        assert_eq!(transaction.reference, "T685312322670591");
        assert_eq!(transaction.amount, 500_000);
    }

    #[test]
    fn failed_transaction_is_not_successful() {
        let body = r#"{
            "status": true,
            "message": "Verification successful",
            "data": {
                "status": "abandoned",
                "reference": "T100",
                "amount": 10000,
                "currency": "NGN"
            }
        }"#;

        let envelope: VerifyEnvelope = serde_json::from_str(body).unwrap();
        assert!(!envelope.data.unwrap().is_successful());
    }

    #[test]
    fn error_envelope_deserializes_without_data() {
        let body = r#"{ "status": false, "message": "Transaction reference not found" }"#;

        let envelope: VerifyEnvelope = serde_json::from_str(body).unwrap();
        assert!(!envelope.status);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message, "Transaction reference not found");
    }
}
