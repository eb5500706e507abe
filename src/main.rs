mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;
mod utils;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::io;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{EmployeeStore, PgEmployeeStore};
use crate::utils::uploads::{UploadLimits, UploadStore};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|err| startup_error("Invalid configuration", err))?;

    // Initialize the database pool
    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(|err| startup_error("Failed to connect to the database", err))?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|err| startup_error("Failed to run migrations", err))?;

    let uploads = UploadStore::prepare(
        &config.upload_dir,
        UploadLimits {
            max_files: config.max_upload_files,
            max_file_bytes: config.max_upload_file_bytes,
        },
    )
    .await?;
    info!("Storing uploads under {}", uploads.root().display());

    let store: Arc<dyn EmployeeStore> = Arc::new(PgEmployeeStore::new(pool));
    let store = web::Data::from(store);
    let uploads = web::Data::new(uploads);

    info!("Starting server at {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(uploads.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
