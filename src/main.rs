use std::sync::Arc;

use log::{error, info};
use rpg_persistence_sea_orm::{create_db_pool, create_schema, players::PlayerRepositoryImpl};
use rpg_server_app::build_application;

use crate::config::ServerConfig;

mod config;
mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger().expect("Failed to initialize logger");

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let db = match create_db_pool(&config.database_url, config.max_connections).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = create_schema(&db).await {
        error!("Failed to create player table: {}", e);
        std::process::exit(1);
    }

    let player_repo = Arc::new(PlayerRepositoryImpl::new(db));
    let app = Arc::new(build_application(player_repo));

    info!("Starting application");

    if let Err(e) = rpg_server_api::http::run(
        app,
        &config.host,
        config.port,
        config.request_timeout,
        shutdown_signal(),
    )
    .await
    {
        error!("HTTP API failed: {}", e);
        std::process::exit(1);
    }
}
