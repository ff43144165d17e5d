use std::path::Path;

use crate::model::{DbConnection, ModelManager};
use crate::utils::signal::shutdown_signal;
use crate::{error::AppResult, web::AppState};
use axum::Router;
use sqlx::migrate::Migrator;
use tokio::net::TcpListener;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod auth;
pub mod error;
pub mod form;
pub mod model;
pub mod utils;
pub mod web;

pub static APPLICATION_NAME: &str = "sozo-admin";

/// Connects to the configured database, applies `./migrations` and builds
/// the router.
pub async fn build_server(config: Config) -> AppResult<(AppState, Router)> {
    let db = DbConnection::connect(
        config.app().database_uri(),
        config.app().max_connections(),
    )?;

    let migrator = Migrator::new(Path::new("./migrations")).await?;
    tracing::debug!("applying migrations...");
    migrator.run(db.pool()).await?;

    build_server_with_pool(db, config).await
}

pub async fn build_server_with_pool(
    db: DbConnection,
    config: Config,
) -> AppResult<(AppState, Router)> {
    let mm = ModelManager::new(db);
    let state = AppState::new(mm, config);
    let app = web::routes::build_app(state.clone());
    Ok((state, app))
}

#[tracing::instrument(skip_all)]
pub async fn setup_workers(config: Config) -> AppResult<()> {
    let bindto = config.host().bindto().to_string();
    let (_, app) = build_server(config).await?;
    let listener = TcpListener::bind(&bindto).await?;

    tracing::info!("axum is starting at: {}", bindto);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    let config = Config::load(cfg!(debug_assertions))?;
    setup_workers(config).await?;
    Ok(())
}
