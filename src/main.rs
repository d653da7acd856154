use actix_governor::Governor;
use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod service;
mod store;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::service::check_in_window::CheckInWindowService;
use crate::store::MySqlWindowStore;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Presence is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config.database_url).await?;
    let windows = CheckInWindowService::new(Arc::new(MySqlWindowStore::new(pool.clone())));
    let limiter = routes::build_limiter(config.rate_protected_per_min)?;

    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&limiter))
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(windows.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
