//! Management endpoint handlers.
//!
//! All of these sit behind [`require_internal_key`]; by the time a handler
//! runs, the caller has proven possession of the internal key.
//!
//! [`require_internal_key`]: crate::internal::auth::require_internal_key

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::server::AppState;

/// Payload for `POST /internal/block-ip`. Fields are optional so that a
/// malformed request reaches the validation below and earns a descriptive
/// rejection instead of a bare deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockIpRequest {
    pub ip: Option<String>,
    pub reason: Option<String>,
    pub ttl_seconds: Option<f64>,
}

/// Payload for `POST /internal/unblock-ip`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UnblockIpRequest {
    pub ip: Option<String>,
}

/// Entry shape returned by `GET /internal/denylist`.
#[derive(Debug, Serialize)]
pub struct BlockView {
    pub ip: String,
    pub reason: String,
    pub expires_in_seconds: i64,
}

/// Add an address to the denylist for a caller-chosen TTL.
pub async fn block_ip(State(state): State<AppState>, Json(body): Json<BlockIpRequest>) -> Response {
    let ip = body.ip.unwrap_or_default();
    let reason = body.reason.unwrap_or_else(|| "unspecified".to_string());
    let ttl_seconds = body.ttl_seconds.unwrap_or(0.0);

    if ip.is_empty() || !ttl_seconds.is_finite() || ttl_seconds <= 0.0 {
        return invalid_payload(json!({
            "ip": "string",
            "reason": "string",
            "ttlSeconds": "positive number"
        }));
    }

    state.denylist.add(&ip, ttl_seconds, &reason);
    let size = state.denylist.size();
    state.metrics.set_denylist_size(size);
    tracing::info!(ip = %ip, ttl_seconds, reason = %reason, "Address blocked");

    Json(json!({ "ok": true, "deny_list_size": size })).into_response()
}

/// Remove an address from the denylist. Removing an address that is not
/// blocked still succeeds.
pub async fn unblock_ip(
    State(state): State<AppState>,
    Json(body): Json<UnblockIpRequest>,
) -> Response {
    let ip = body.ip.unwrap_or_default();

    if ip.is_empty() {
        return invalid_payload(json!({ "ip": "string" }));
    }

    state.denylist.remove(&ip);
    let size = state.denylist.size();
    state.metrics.set_denylist_size(size);
    tracing::info!(ip = %ip, "Address unblocked");

    Json(json!({ "ok": true, "deny_list_size": size })).into_response()
}

/// List live blocks with their remaining lifetimes.
pub async fn list_blocks(State(state): State<AppState>) -> Json<Vec<BlockView>> {
    let entries = state
        .denylist
        .list()
        .into_iter()
        .map(|entry| BlockView {
            expires_in_seconds: entry.expires_in_secs(),
            ip: entry.ip,
            reason: entry.reason,
        })
        .collect();
    Json(entries)
}

/// Trip the crash latch. Irreversible until process restart.
pub async fn trigger_crash(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.ops.fail();
    tracing::error!("Crash latch tripped; all requests will fail until restart");
    Json(json!({ "status": "dying" }))
}

fn invalid_payload(expected: serde_json::Value) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid payload", "expected": expected })),
    )
        .into_response()
}
