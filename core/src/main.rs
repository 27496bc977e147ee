mod cors;
mod health;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connections, online first
    let stores = db::setup(
        &config.online_database_url,
        &config.offline_database_url,
        is_production,
    )
    .await
    .expect("Failed to set up databases");

    HttpServer::new(move || {
        let admin_keys = config_data.admin_api_keys.clone();
        App::new()
            .app_data(web::Data::new(stores.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .wrap(logger::middleware()) // 3rd
            .wrap(extractor::middleware()) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(health::get_health)
            .service(api_auth::mount_auth())
            .service(
                web::scope("/user")
                    .wrap(api_auth::auth_middleware())
                    .service(api_auth::routes::user::get_dashboard),
            )
            .service(
                web::scope("/pay")
                    .wrap(api_auth::auth_middleware())
                    .service(api_subs::routes::pay::post_verify),
            )
            .service(
                web::scope("/code-gen")
                    .wrap(api_auth::admin_middleware(admin_keys.clone()))
                    .service(api_codes::routes::codes::post_generate)
                    .service(api_codes::routes::codes::post_redeem),
            )
            .service(
                web::scope("/sync")
                    .wrap(api_auth::admin_middleware(admin_keys))
                    .service(sync::routes::admin::post_sync_users)
                    .service(sync::routes::admin::get_code_divergence),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
