//! API token middleware
//!
//! Guards the ingestion route. Requests must carry an `X-API-Token` header
//! matching the configured token; the comparison runs in constant time.

use crate::routes::AppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Header carrying the API token
pub const TOKEN_HEADER: &str = "X-API-Token";

/// Reject requests without a valid API token.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = match request.headers().get(TOKEN_HEADER) {
        Some(value) => value.as_bytes(),
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "missing API token"})),
            )
                .into_response();
        }
    };

    if !token_matches(provided, state.config.api_token.as_bytes()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid API token"})),
        )
            .into_response();
    }

    next.run(request).await
}

/// Constant-time byte comparison. Only the token content is secret; the
/// length check may exit early.
fn token_matches(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
