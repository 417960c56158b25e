//! HTTP server setup.
//!
//! # Responsibilities
//! - Assemble the router: public application routes plus the privileged
//!   `/internal` subtree
//! - Layer the middleware stack (tracing, request ids, timeout, gate)
//! - Spawn the denylist sweeper alongside the listener
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - The gate sits innermost so every layer above it (including the
//!   timeout) still applies to short-circuited responses
//! - `/metrics` is served from the main listener and must therefore stay
//!   in the exempt set, or a blocked scraper goes dark

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::accounts::{login, signup, AccountStore};
use crate::app::auction::{auction_state, place_bid, AuctionHouse};
use crate::config::GateConfig;
use crate::denylist::{sweep, Denylist};
use crate::gate::{gate_middleware, ExemptPaths, OperationalState};
use crate::http::request_id::MakeRequestUuid;
use crate::internal::internal_router;
use crate::observability::MetricsSink;

/// Shared state injected into middleware and handlers. Cheap to clone;
/// everything inside is shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
    pub denylist: Denylist,
    pub exempt: Arc<ExemptPaths>,
    pub ops: Arc<OperationalState>,
    pub metrics: Arc<dyn MetricsSink>,
    pub prometheus: PrometheusHandle,
    pub auction: Arc<AuctionHouse>,
    pub accounts: Arc<AccountStore>,
}

/// HTTP server for the edge gate.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Build the server from configuration plus the two observability
    /// handles: the sink metrics are recorded through, and the Prometheus
    /// handle `/metrics` renders from.
    pub fn new(
        config: GateConfig,
        metrics: Arc<dyn MetricsSink>,
        prometheus: PrometheusHandle,
    ) -> Self {
        let exempt = ExemptPaths::new(config.gate.exempt_paths.clone());
        let accounts = AccountStore::new(config.app.users_path.clone());

        let state = AppState {
            config: Arc::new(config),
            denylist: Denylist::new(),
            exempt: Arc::new(exempt),
            ops: Arc::new(OperationalState::new()),
            metrics,
            prometheus,
            auction: Arc::new(AuctionHouse::new()),
            accounts: Arc::new(accounts),
        };

        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Handle to the denylist, for embedding and tests.
    pub fn denylist(&self) -> Denylist {
        self.state.denylist.clone()
    }

    fn build_router(state: AppState) -> Router {
        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);
        // The privileged subtree mounts at the same prefix the gate
        // recognizes as self-authorizing; config validation keeps it a
        // proper non-root path.
        let internal_prefix = state.config.internal.path_prefix.clone();

        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(scrape_metrics))
            .route("/state", get(auction_state))
            .route("/bid", post(place_bid))
            .route("/signup", post(signup))
            .route("/login", post(login))
            .nest(&internal_prefix, internal_router(state.clone()))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(request_timeout))
                    .layer(middleware::from_fn_with_state(
                        state.clone(),
                        gate_middleware,
                    )),
            )
            .with_state(state)
    }

    /// Run the server on the given listener until the shutdown signal
    /// fires. The denylist sweeper runs for the same lifetime.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweep_interval = Duration::from_secs(self.state.config.denylist.sweep_interval_secs);
        tokio::spawn(sweep::run_sweeper(
            self.state.denylist.clone(),
            self.state.metrics.clone(),
            sweep_interval,
            shutdown.resubscribe(),
        ));

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness probe; exempt from the gate so a blocked address still sees
/// the service as up.
async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Prometheus exposition. Refreshes the denylist gauge first so a scrape
/// between sweeps still reports the current size.
async fn scrape_metrics(State(state): State<AppState>) -> Response {
    state.metrics.set_denylist_size(state.denylist.size());
    let body = state.prometheus.render();
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
