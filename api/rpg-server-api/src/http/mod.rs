use std::{sync::Arc, time::Duration};

use axum::{Router, http::StatusCode, routing::get};
use log::info;
use rpg_server_app::Application;
use tower_http::timeout::TimeoutLayer;

mod players;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

fn player_routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/players", prefix),
            get(players::get_all).post(players::create),
        )
        .route(&format!("{}/players/count", prefix), get(players::count))
        .route(
            &format!("{}/players/{{id}}", prefix),
            get(players::get_by_id)
                .post(players::update)
                .delete(players::delete),
        )
}

fn timeout_layer(request_timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout)
}

/// Player routes, served at the root and under `/rest`.
pub fn router(app: Arc<Application>, request_timeout: Duration) -> Router {
    Router::new()
        .merge(player_routes(""))
        .merge(player_routes("/rest"))
        .layer(timeout_layer(request_timeout))
        .with_state(AppState { app })
}

pub async fn run(
    app: Arc<Application>,
    host: &str,
    port: u16,
    request_timeout: Duration,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;

    info!("API server listening on {}:{}", host, port);
    axum::serve(listener, router(app, request_timeout))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}
