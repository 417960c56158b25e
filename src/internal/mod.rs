//! Privileged management interface.
//!
//! Block/unblock, denylist inspection and the crash trigger, all behind
//! a single bearer token. The gate middleware deliberately passes the
//! `/internal` prefix through untouched; authorization happens here.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::http::server::AppState;

use self::auth::require_internal_key;
use self::handlers::{block_ip, list_blocks, trigger_crash, unblock_ip};

/// Router for the `/internal` subtree, with the bearer check layered over
/// every route.
pub fn internal_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/block-ip", post(block_ip))
        .route("/unblock-ip", post(unblock_ip))
        .route("/denylist", get(list_blocks))
        .route("/crash", post(trigger_crash))
        .layer(middleware::from_fn_with_state(state, require_internal_key))
}
