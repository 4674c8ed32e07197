//! HTTP ingress for Magellan
//!
//! A thin axum layer over the store pipeline:
//! - `POST /mfrequest` - ingest one JSON document (token-protected)
//! - `GET /health` - liveness probe, unauthenticated
//!
//! Configuration comes from `magellan.toml` ([`MagellanConfig`]); the
//! `magelland` binary wires everything together.

pub mod auth;
pub mod config;
pub mod routes;

pub use config::{MagellanConfig, CONFIG_FILE_NAME};
pub use routes::{router, AppState};

use std::sync::Arc;
use tracing::info;

/// Bind the listen address and serve until ctrl-c.
pub async fn serve(config: MagellanConfig) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let app = router(Arc::new(config));

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(bind = %bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
