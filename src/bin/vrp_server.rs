//! HTTP server entry point (feature `http`): serves `POST /solve` and
//! `GET /instances` over the library's [`vrptw_core::http`] façade.

use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use vrptw_core::http::{AppState, router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().compact())
        .init();

    let instances_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("instances"));
    let addr = std::env::var("VRP_SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let state = AppState { instances_dir };
    let app = router(state);

    info!(%addr, "starting vrp-server");
    let listener = TcpListener::bind(&addr).await.expect("failed to bind address");
    axum::serve(listener, app).await.expect("server error");
}
