use std::io;
use std::path::Path;
use std::time::Duration;

use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use storefront::models::config::ServerConfig;
use storefront::repository::{CachedRepository, HttpCatalogRepository};
use storefront::routes;
use storefront::services::inflight::InFlightUpdates;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let app_env = std::env::var("APP_ENV").ok();
    let server_config = ServerConfig::load(Path::new("config"), app_env.as_deref())
        .map_err(|e| io::Error::other(format!("failed to load configuration: {e}")))?;

    let secret_key = if server_config.secret_key.is_empty() {
        log::warn!("No secret_key configured, flash messages will not survive a restart");
        Key::generate()
    } else {
        Key::try_from(server_config.secret_key.as_bytes())
            .map_err(|e| io::Error::other(format!("invalid secret_key: {e:?}")))?
    };

    let tera = Tera::new(&format!("{}/**/*", server_config.templates_dir))
        .map_err(|e| io::Error::other(format!("failed to load templates: {e}")))?;

    let catalog = HttpCatalogRepository::new(
        &server_config.catalog_base_url,
        Duration::from_secs(server_config.request_timeout_secs),
    )
    .map_err(io::Error::other)?;
    log::info!("Using catalog at {}", catalog.base_url());

    let repo = web::Data::new(CachedRepository::new(catalog));
    let in_flight = web::Data::new(InFlightUpdates::default());
    let tera = web::Data::new(tera);
    let message_framework =
        FlashMessagesFramework::builder(CookieMessageStore::builder(secret_key).build()).build();

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Starting storefront on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(Logger::default())
            .app_data(repo.clone())
            .app_data(in_flight.clone())
            .app_data(tera.clone())
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
