use actix_web::{Responder, get, web};
use chrono::Utc;
use common::{error::Res, http::Success, jwt::JwtClaims};
use db::Stores;

use crate::{dtos::user::DashboardResponse, services};

/// Returns the authenticated user's profile together with a breakdown of the
/// remaining subscription time.
///
/// # Arguments
///
/// * `claims` - The JWT claims of the authenticated user.
/// * `stores` - Handles to the online and offline databases.
///
/// # Returns
///
/// A `Result` containing a `Success` response with the dashboard or an `AppError` if an error occurs.
#[get("/dashboard")]
pub async fn get_dashboard(
    claims: web::ReqData<JwtClaims>,
    stores: web::Data<Stores>,
) -> Res<impl Responder> {
    let user = services::user::get_user_by_id(&stores.online, claims.user_id).await?;
    let subscription = services::user::subscription_overview(user.subscription_expires_at, Utc::now());

    Success::ok(DashboardResponse {
        user: user.into(),
        subscription,
    })
}
