use actix_web::web;
use middleware::{admin::AdminKeyMiddleware, auth::AuthMiddleware};

pub mod routes {
    pub mod auth;
    pub mod user;
}
pub mod middleware {
    pub mod admin;
    pub mod auth;
}

mod dtos {
    pub(crate) mod auth;
    pub(crate) mod user;
}
mod services {
    pub(crate) mod auth;
    pub(crate) mod user;
}

pub fn mount_auth() -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::post_register)
        .service(routes::auth::post_login)
        .service(routes::auth::post_check_access)
}

/// Guards routes that require a valid bearer token.
pub fn auth_middleware() -> AuthMiddleware {
    AuthMiddleware::new()
}

/// Guards operator routes behind the `X-Admin-Key` header.
pub fn admin_middleware(keys: Vec<String>) -> AdminKeyMiddleware {
    AdminKeyMiddleware::new(keys)
}
