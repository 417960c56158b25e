//! The per-request gate.
//!
//! # Data Flow
//!
//! ```text
//! request ──► crash latch ──► /internal bypass ──► resolve identity
//!                 │                  │                    │
//!                 ▼                  ▼                    ▼
//!              500 always      inner handlers      exempt? ──► denylist ──► inner
//!                                                                │
//!                                                                ▼
//!                                                           403 blocked
//! ```
//!
//! Every exit path, short-circuit or not, feeds the request counter.
//! Duration timing only covers requests that passed the denylist check;
//! internal and exempt traffic is counted but not timed.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::server::AppState;
use crate::identity::resolve_client_ip;

/// Gate every request: crash latch first, then denylist enforcement for
/// non-internal, non-exempt paths.
pub async fn gate_middleware(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().as_str().to_string();
    // Path only; query strings never participate in checks or labels.
    let route = request.uri().path().to_string();

    // The latch outranks everything, exempt and internal paths included:
    // its contract is a failure on every request until restart.
    if state.ops.is_failed() {
        let response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal Server Error (Simulated Crash)" })),
        )
            .into_response();
        state
            .metrics
            .record_request(&method, &route, response.status().as_u16());
        return response;
    }

    // Internal endpoints carry their own authorization; gating them on the
    // denylist could lock an operator out of the unblock call.
    if route.starts_with(&state.config.internal.path_prefix) {
        let response = next.run(request).await;
        state
            .metrics
            .record_request(&method, &route, response.status().as_u16());
        return response;
    }

    let identity = resolve_client_ip(None, Some(&peer.ip().to_string()), request.headers());
    tracing::debug!(
        ip = %identity.ip,
        raw_ip = ?identity.raw_ip,
        source = %identity.source,
        route = %route,
        "Client identity resolved"
    );
    // Handlers downstream read the resolved identity from extensions.
    request.extensions_mut().insert(identity.clone());

    // Exempt paths pass with no denylist check and no timing, so probes
    // and scrapes stay out of the latency histogram.
    if state.exempt.contains(&route) {
        let response = next.run(request).await;
        state
            .metrics
            .record_request(&method, &route, response.status().as_u16());
        return response;
    }

    if let Some(block) = state.denylist.get(&identity.ip) {
        state.metrics.record_blocked(&route);
        tracing::warn!(
            ip = %identity.ip,
            reason = %block.reason,
            route = %route,
            "Request blocked by denylist"
        );
        let response = (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "blocked", "reason": block.reason })),
        )
            .into_response();
        state
            .metrics
            .record_request(&method, &route, response.status().as_u16());
        return response;
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let status = response.status().as_u16();
    state
        .metrics
        .observe_duration(&method, &route, status, start.elapsed().as_secs_f64());
    state.metrics.record_request(&method, &route, status);
    response
}
