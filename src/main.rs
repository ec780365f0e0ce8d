use std::io;
use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::routing::{get, get_service};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

mod channels;
mod config;
mod cors;
mod error;
mod proxy;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let port = config.port;
    if config.proxy_key.is_some() {
        tracing::info!("relay access key configured");
    }
    let state = AppState::new(config);

    let static_files =
        get_service(ServeDir::new("static")).handle_error(|err: io::Error| async move {
            tracing::error!(error = %err, "failed to serve static asset");
            (StatusCode::INTERNAL_SERVER_ERROR, "Static asset error")
        });

    let app = Router::new()
        .route(
            "/api/channels",
            get(channels::list_channels).options(cors::preflight),
        )
        .route(
            "/api/proxy",
            get(proxy::proxy_handler).options(cors::preflight),
        )
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("Streambox running on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
