use std::sync::Arc;

use actix_web::{Responder, post, web};
use chrono::Utc;
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use common::jwt::{self, ClaimsSpec};
use common::misc::normalize_email;
use db::Stores;

use crate::dtos::auth::{
    AuthResponse, CheckAccessRequest, CheckAccessResponse, LoginRequest, RegisterRequest,
};
use crate::services;

/// Registers a new user with email and password authentication.
///
/// # Input
/// - `req`: JSON payload containing registration information (email, password, account_type, optional name)
/// - `stores`: Database handles
/// - `config`: Application configuration
///
/// # Output
/// - Success: Returns a JWT token and the created user with 201 Created status
/// - Error: Returns 409 Conflict if the email is already registered
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/auth/register', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({
///     email: 'user@example.com',
///     password: 'securepassword',
///     account_type: 'USER',
///     name: 'Jane Doe' // Optional
///   })
/// });
///
/// if (response.ok) {
///   const { token, user } = await response.json();
///   localStorage.setItem('authToken', token);
/// }
/// ```
#[post("/register")]
pub async fn post_register(
    req: web::Json<RegisterRequest>,
    stores: web::Data<Stores>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let user = services::user::register_user(&stores, &req.into_inner()).await?;
    let token = jwt::generate_jwt(
        ClaimsSpec {
            user_id: user.id,
            email: user.email.clone(),
            account_type: user.account_type,
        },
        &config.jwt_config,
    )?;

    Success::created(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Authenticates a user with email and password.
///
/// # Input
/// - `login_data`: JSON payload containing email and password
/// - `config`: Application configuration for JWT generation
/// - `stores`: Database handles
///
/// # Output
/// - Success: Returns an auth response with JWT token and user details
/// - Error: Returns 401 Unauthorized for invalid credentials
#[post("/login")]
pub async fn post_login(
    login_data: web::Json<LoginRequest>,
    config: web::Data<Arc<Config>>,
    stores: web::Data<Stores>,
) -> Res<impl Responder> {
    let user = services::auth::authenticate_user(&stores.online, &login_data.into_inner()).await?;
    let token = jwt::generate_jwt(
        ClaimsSpec {
            user_id: user.id,
            email: user.email.clone(),
            account_type: user.account_type,
        },
        &config.jwt_config,
    )?;

    Success::ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Answers whether an account currently has an active subscription.
/// Used by the local redemption machines, so it takes an email instead of a
/// bearer token.
#[post("/check-access")]
pub async fn post_check_access(
    req: web::Json<CheckAccessRequest>,
    stores: web::Data<Stores>,
) -> Res<impl Responder> {
    let email = normalize_email(&req.email);
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let user = services::user::get_user_by_email(&stores.online, &email).await?;
    let has_access = user
        .subscription_expires_at
        .map(|expires_at| expires_at > Utc::now())
        .unwrap_or(false);
    let message = if has_access {
        "Access granted".to_string()
    } else {
        "Subscription expired or not activated".to_string()
    };

    Success::ok(CheckAccessResponse {
        has_access,
        message,
        user: user.into(),
    })
}
