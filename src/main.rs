mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod seed;
mod services;
mod utils;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use crate::config::AppConfig;
use crate::seed::factory::EmployeeFactory;
use crate::services::employee::EmployeeService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Missing key/IV or an unreachable database is fatal.
    let config = AppConfig::from_env().map_err(startup_error)?;
    let cipher = Arc::new(config.cipher().map_err(startup_error)?);
    let store = db::create_store(&config.storage).await.map_err(startup_error)?;

    let factory = EmployeeFactory::new(cipher.clone());
    seed::seed_if_empty(store.as_ref(), &factory, config.seed_employees)
        .await
        .map_err(startup_error)?;

    let service = web::Data::new(EmployeeService::new(store, cipher));

    info!("Starting server at {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .configure(handlers::employee::configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}

fn startup_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    error!("Startup failed: {}", err);
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
