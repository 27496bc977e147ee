use actix_web::{
    Responder, get, post,
    web::{self},
};
use common::{error::Res, http::Success};
use db::Stores;

use crate::services;

/// Replays every online user into the offline replica.
///
/// # Arguments
///
/// * `stores` - Handles to the online and offline databases.
///
/// # Returns
///
/// A `Result` containing a `Success` response with the sync counts or an `AppError` if an error occurs.
#[post("/users")]
pub async fn post_sync_users(stores: web::Data<Stores>) -> Res<impl Responder> {
    let report = services::users::sync_all_users(&stores).await?;
    Success::ok(report)
}

/// Reports whether the two code stores hold the same code set.
#[get("/codes/divergence")]
pub async fn get_code_divergence(stores: web::Data<Stores>) -> Res<impl Responder> {
    let report = services::codes::code_divergence(&stores).await?;
    Success::ok(report)
}
