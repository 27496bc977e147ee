use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
    paystack,
};
use db::Stores;

use crate::{
    dtos::pay::{VerifyRequest, VerifyResponse},
    services,
};

/// Verifies a Paystack transaction and extends the caller's subscription.
///
/// # Input
/// - `claims`: JWT claims of the paying user
/// - `req`: JSON payload containing the Paystack transaction `reference`
/// - `stores`: Database handles
/// - `config`: Application configuration with the Paystack secret key
///
/// # Output
/// - Success: Returns the new expiry date and the number of days added
/// - Error: 400 when Paystack rejects the transaction, 409 when the
///   reference was already processed, 502 when Paystack is unreachable
///
/// # Note
/// The frontend completes the Paystack checkout first and then posts the
/// transaction reference here; the server trusts Paystack's verify API, not
/// the client.
#[post("/verify")]
pub async fn post_verify(
    claims: web::ReqData<JwtClaims>,
    req: web::Json<VerifyRequest>,
    stores: web::Data<Stores>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let reference = req.reference.trim();
    if reference.is_empty() {
        return Err(AppError::BadRequest(
            "Payment reference is required".to_string(),
        ));
    }

    let transaction = paystack::verify_transaction(&config, reference).await?;
    let subscription = services::sub::extend_subscription(
        &stores,
        claims.user_id,
        &transaction,
        config.subscription_extension_days,
    )
    .await?;

    Success::ok(VerifyResponse { subscription })
}
