//! Bearer-token check for the management endpoints.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::server::AppState;

/// Reject any request whose `Authorization` header does not carry the
/// configured bearer token. A missing header, a non-bearer scheme and a
/// mismatched token all yield the same unauthorized body.
pub async fn require_internal_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == state.config.internal.api_key);

    if !authorized {
        tracing::warn!(
            path = %request.uri().path(),
            "Unauthorized internal API call"
        );
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response();
    }

    next.run(request).await
}
