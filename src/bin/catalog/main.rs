use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use anyhow::Context;
use actix_web::cookie::{Key, SameSite};
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use env_logger::Env;
use herbarium::app_config::APP_CONFIG;
use herbarium::db::init_db;
use herbarium::storage::{init_file_store, local::LocalStore, s3::S3Store};
use rand::{distributions::Alphanumeric, Rng};
use rusoto_core::Region;
use std::path::PathBuf;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    init_db(std::env::var("DATABASE_URL").expect("DATABASE_URL must be set.")).await;
    init_storage().expect("Failed to initialize file storage.");

    let secret_key = match std::env::var("SECRET_KEY") {
        Ok(key) => Key::from(key.as_bytes()),
        Err(err) => {
            let random_string: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(128)
                .map(char::from)
                .collect();
            log::warn!("SECRET_KEY was invalid. Reason: {:?}\r\nThis means the key used for signing session cookies will invalidate every time the application is restarted. A secret key must be at least 64 bytes to be accepted.", err);
            Key::from(random_string.as_bytes())
        }
    };

    let bind = (
        APP_CONFIG.server.host.clone(),
        APP_CONFIG.server.port,
    );
    log::info!(
        "{} listening on {}:{}",
        APP_CONFIG.site.name,
        bind.0,
        bind.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_name("herbarium_session".to_string())
                    .cookie_same_site(SameSite::Lax)
                    .build(),
            )
            .configure(herbarium::web::configure)
    })
    .bind(bind)?
    .run()
    .await
}

/// Select the file storage backend from configuration.
fn init_storage() -> anyhow::Result<()> {
    let storage = &APP_CONFIG.storage;
    match storage.backend.as_str() {
        "s3" => {
            let region = if storage.s3_endpoint.is_empty() {
                storage
                    .s3_region
                    .parse()
                    .context("Unrecognized S3 region name")?
            } else {
                Region::Custom {
                    name: storage.s3_region.clone(),
                    endpoint: storage.s3_endpoint.clone(),
                }
            };
            init_file_store(Box::new(S3Store::new(
                region,
                storage.s3_bucket.clone(),
                storage.s3_public_url.clone(),
            )));
        }
        _ => {
            let store = LocalStore::new(
                PathBuf::from(&storage.local_path),
                APP_CONFIG.site.base_url.clone(),
            )
            .context("Failed to initialize local file storage")?;
            init_file_store(Box::new(store));
        }
    }
    Ok(())
}
