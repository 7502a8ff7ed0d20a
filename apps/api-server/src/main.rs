//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer};
use quill_infra::DatabaseConnections;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await.map_err(|e| {
        tracing::error!("{}", e);
        std::io::Error::other(e)
    })?;

    if let Some(admin) = &config.admin {
        state.provision_admin(admin).await;
    }

    let db = state.db.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .configure(|cfg| state.register(cfg))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    close_database(db).await;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(feature = "postgres")]
async fn close_database(db: Option<Arc<DatabaseConnections>>) {
    let Some(db) = db else { return };
    match Arc::try_unwrap(db) {
        Ok(connections) => {
            if let Err(e) = connections.close().await {
                tracing::warn!("Failed to close database pool: {}", e);
            }
        }
        Err(_) => tracing::debug!("Database pool still shared at shutdown"),
    }
}

#[cfg(not(feature = "postgres"))]
async fn close_database(_db: Option<Arc<DatabaseConnections>>) {}
