use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::jwt;
use futures::future::{Ready, ok};

/// Rejects requests whose bearer token did not validate and exposes the
/// claims as `web::ReqData<JwtClaims>` to the handlers behind it. Relies on
/// the extractor middleware having already parsed the Authorization header.
pub struct AuthMiddleware {}

impl AuthMiddleware {
    pub fn new() -> Self {
        AuthMiddleware {}
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Arc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            match jwt::get_jwt_claims_or_error(&req) {
                Ok(claims) => {
                    // make claims available to handlers as ReqData<JwtClaims>
                    req.extensions_mut().insert(claims);
                    srv.call(req).await.map(|res| res.map_into_boxed_body())
                }
                Err(response) => Ok(req.into_response(response)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, Responder, http::StatusCode, test, web};
    use common::{
        env_config::{Config, JwtConfig},
        jwt::{ClaimsSpec, JwtClaims, generate_jwt},
        misc::AccountType,
    };
    use uuid::Uuid;

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            environment: "development".to_string(),
            online_database_url: String::new(),
            offline_database_url: String::new(),
            jwt_config: JwtConfig {
                secret: "middleware-test-secret".to_string(),
                expiration_hours: 1,
            },
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            num_workers: 1,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            console_logging_enabled: false,
            admin_api_keys: Vec::new(),
            paystack_secret_key: String::new(),
            paystack_base_url: "https://api.paystack.co".to_string(),
            subscription_extension_days: 30,
        })
    }

    async fn whoami(claims: web::ReqData<JwtClaims>) -> impl Responder {
        HttpResponse::Ok().json(serde_json::json!({ "email": claims.email }))
    }

    macro_rules! secured_app {
        ($config:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($config))
                    .wrap(extractor::middleware())
                    .service(
                        web::scope("/secure")
                            .wrap(AuthMiddleware::new())
                            .route("/whoami", web::get().to(whoami)),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized() {
        let app = secured_app!(test_config());

        let req = test::TestRequest::get().uri("/secure/whoami").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_token_is_unauthorized() {
        let app = secured_app!(test_config());

        let req = test::TestRequest::get()
            .uri("/secure/whoami")
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler_with_claims() {
        let config = test_config();
        let token = generate_jwt(
            ClaimsSpec {
                user_id: Uuid::new_v4(),
                email: "reader@example.com".to_string(),
                account_type: AccountType::User,
            },
            &config.jwt_config,
        )
        .unwrap();

        let app = secured_app!(config);
        let req = test::TestRequest::get()
            .uri("/secure/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["email"], "reader@example.com");
    }

    #[actix_web::test]
    async fn token_signed_with_another_secret_is_unauthorized() {
        let foreign = JwtConfig {
            secret: "some-other-secret".to_string(),
            expiration_hours: 1,
        };
        let token = generate_jwt(
            ClaimsSpec {
                user_id: Uuid::new_v4(),
                email: "reader@example.com".to_string(),
                account_type: AccountType::User,
            },
            &foreign,
        )
        .unwrap();

        let app = secured_app!(test_config());
        let req = test::TestRequest::get()
            .uri("/secure/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
