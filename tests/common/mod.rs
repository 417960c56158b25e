//! Shared utilities for integration testing.
//!
//! Spawns a real gate server on an ephemeral loopback port; tests talk to
//! it over HTTP exactly as a client would.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;

use edge_gate::config::GateConfig;
use edge_gate::denylist::Denylist;
use edge_gate::lifecycle::Shutdown;
use edge_gate::observability::{install_recorder, PrometheusMetrics};
use edge_gate::HttpServer;

pub const INTERNAL_KEY: &str = "test-internal-key";

// One recorder per test process; every spawned server shares it.
static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

fn prometheus_handle() -> PrometheusHandle {
    PROMETHEUS
        .get_or_init(|| install_recorder().expect("prometheus recorder install"))
        .clone()
}

/// A running gate plus handles for poking at it.
pub struct TestGate {
    pub base_url: String,
    pub denylist: Denylist,
    pub shutdown: Shutdown,
    _users_dir: tempfile::TempDir,
}

impl TestGate {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Boot a gate server with test-friendly settings.
pub async fn spawn_gate() -> TestGate {
    spawn_gate_with(|_| {}).await
}

/// Boot a gate server, letting the test tweak the configuration first.
pub async fn spawn_gate_with(tweak: impl FnOnce(&mut GateConfig)) -> TestGate {
    let users_dir = tempfile::tempdir().expect("tempdir");

    let mut config = GateConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.internal.api_key = INTERNAL_KEY.to_string();
    config.app.users_path = users_dir
        .path()
        .join("users.json")
        .to_string_lossy()
        .into_owned();
    config.app.max_bid_delay_ms = 0;
    config.denylist.sweep_interval_secs = 1;
    tweak(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    let server = HttpServer::new(
        config,
        Arc::new(PrometheusMetrics),
        prometheus_handle(),
    );
    let denylist = server.denylist();

    let shutdown = Shutdown::new();
    let run_rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, run_rx).await;
    });

    TestGate {
        base_url: format!("http://{addr}"),
        denylist,
        shutdown,
        _users_dir: users_dir,
    }
}
