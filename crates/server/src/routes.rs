//! HTTP routes for the ingestion service
//!
//! One protected ingestion route plus an unauthenticated health probe. The
//! blocking store pipeline runs on the blocking pool with a connection
//! scoped to the request; the connection is dropped on every exit path.

use crate::auth::require_token;
use crate::config::MagellanConfig;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use magellan_core::Error;
use magellan_store::{connection, write_document};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, immutable for the process lifetime
    pub config: Arc<MagellanConfig>,
}

/// Build the application router.
pub fn router(config: Arc<MagellanConfig>) -> Router {
    let state = AppState { config };

    let protected = Router::new()
        .route("/mfrequest", post(ingest))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .merge(protected)
        .route("/health", get(health))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Log every incoming request before dispatch.
async fn log_request(request: Request, next: Next) -> Response {
    info!(
        method = %request.method(),
        path = %request.uri().path(),
        query = request.uri().query().unwrap_or(""),
        "incoming request"
    );
    next.run(request).await
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Ingest one JSON document.
///
/// The body is parsed here rather than by an extractor so a malformed
/// document maps to a client error before any store I/O happens.
async fn ingest(State(state): State<AppState>, body: String) -> Response {
    let document: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(err) => {
            let err = Error::MalformedDocument(err.to_string());
            return (StatusCode::BAD_REQUEST, Json(json!({"error": err.to_string()})))
                .into_response();
        }
    };

    let config = state.config.clone();
    let outcome = tokio::task::spawn_blocking(move || -> magellan_core::Result<Value> {
        let conn = connection::open(&config.database)?;
        write_document(&conn, &config.table, &document)?;
        Ok(document)
    })
    .await;

    match outcome {
        Ok(Ok(document)) => {
            info!(table = %state.config.table, "document stored");
            (
                StatusCode::OK,
                Json(json!({"status": "stored", "received": document})),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            error!(error = %err, "ingestion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": err.to_string()})),
            )
                .into_response()
        }
        Err(join_err) => {
            error!(error = %join_err, "ingestion task panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal error"})),
            )
                .into_response()
        }
    }
}
