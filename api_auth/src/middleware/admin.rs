use std::{future::Future, pin::Pin, rc::Rc, sync::Arc};

use actix_web::{
    Error, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{Ready, ok};
use log::info;

/// Guards operator routes. The caller must present one of the configured
/// admin keys in the `X-Admin-Key` header; there is no user identity behind
/// these routes, just the shared operator secret.
pub struct AdminKeyMiddleware {
    admin_api_keys: Rc<Vec<String>>,
}

impl AdminKeyMiddleware {
    pub fn new(keys: Vec<String>) -> Self {
        AdminKeyMiddleware {
            admin_api_keys: Rc::new(keys),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AdminKeyMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminKeyMiddlewareService {
            service: Arc::new(service),
            admin_api_keys: self.admin_api_keys.clone(),
        })
    }
}

pub struct AdminKeyMiddlewareService<S> {
    service: Arc<S>,
    admin_api_keys: Rc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for AdminKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let valid_keys = self.admin_api_keys.clone();
        let header_key = req
            .headers()
            .get("X-Admin-Key")
            .and_then(|value| value.to_str().ok());
        let path = req.path().to_owned();
        let srv = Arc::clone(&self.service);

        // Check the key before moving the request
        if let Some(key) = header_key {
            if valid_keys.iter().any(|valid| valid == key) {
                info!("Valid admin key for path {}", path);
                let fut = srv.call(req);
                return Box::pin(async move { fut.await.map(|res| res.map_into_boxed_body()) });
            }
        }

        let error_message = if header_key.is_some() {
            "Invalid admin key"
        } else {
            "No admin key provided"
        };

        log::error!("{} for path {}", error_message, path);
        let response = HttpResponse::Unauthorized()
            .json(serde_json::json!({ "error": error_message }))
            .map_into_boxed_body();

        let (request, _payload) = req.into_parts();

        Box::pin(async move { Ok(ServiceResponse::new(request, response)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    async fn probe() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn keys() -> Vec<String> {
        vec!["ops-key-one".to_string(), "ops-key-two".to_string()]
    }

    #[actix_web::test]
    async fn missing_admin_key_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AdminKeyMiddleware::new(keys()))
                    .route("/probe", web::post().to(probe)),
            ),
        )
        .await;

        let req = test::TestRequest::post().uri("/admin/probe").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn wrong_admin_key_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AdminKeyMiddleware::new(keys()))
                    .route("/probe", web::post().to(probe)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/admin/probe")
            .insert_header(("X-Admin-Key", "not-a-real-key"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn any_configured_admin_key_is_accepted() {
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AdminKeyMiddleware::new(keys()))
                    .route("/probe", web::post().to(probe)),
            ),
        )
        .await;

        for key in ["ops-key-one", "ops-key-two"] {
            let req = test::TestRequest::post()
                .uri("/admin/probe")
                .insert_header(("X-Admin-Key", key))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
        }
    }

    #[actix_web::test]
    async fn no_keys_configured_rejects_everything() {
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AdminKeyMiddleware::new(Vec::new()))
                    .route("/probe", web::post().to(probe)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/admin/probe")
            .insert_header(("X-Admin-Key", "anything"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
