use actix_web::{
    Responder, post,
    web::{self},
};
use common::{error::Res, http::Success, misc::AccountType};
use db::Stores;

use crate::{
    dtos::codes::{GenerateBatchRequest, GenerateBatchResponse, RedeemRequest, RedeemResponse},
    services,
};

/// Generates a batch of redemption codes and writes it to both stores.
///
/// # Arguments
///
/// * `stores` - Handles to the online and offline databases.
/// * `req` - The requested number of USER and CREATOR codes.
///
/// # Returns
///
/// A `Result` containing a `Success` response with the batch counts or an `AppError` if an error occurs.
#[post("")]
pub async fn post_generate(
    stores: web::Data<Stores>,
    req: web::Json<GenerateBatchRequest>,
) -> Res<impl Responder> {
    let summary = services::batch::generate_batch(&stores, req.users, req.creators).await?;

    Success::ok(GenerateBatchResponse {
        message: format!(
            "Generated {} USER codes and {} CREATOR codes",
            summary.users, summary.creators
        ),
        users: summary.users,
        creators: summary.creators,
    })
}

/// Claims the oldest unused code for the requested account type.
///
/// # Arguments
///
/// * `stores` - Handles to the online and offline databases.
/// * `req` - The account type to redeem a code for.
///
/// # Returns
///
/// A `Result` containing a `Success` response with the claimed code or an `AppError` if an error occurs.
#[post("/redeem")]
pub async fn post_redeem(
    stores: web::Data<Stores>,
    req: web::Json<RedeemRequest>,
) -> Res<impl Responder> {
    let account_type = AccountType::from_str(&req.account_type)?;
    let code = services::redeem::redeem_code(&stores.online, account_type).await?;

    Success::ok(RedeemResponse {
        code: code.code_string,
        account_type: code.account_type,
    })
}
