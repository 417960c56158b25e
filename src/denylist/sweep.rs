//! Periodic denylist purge.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::denylist::store::Denylist;
use crate::observability::metrics::MetricsSink;

/// Purge expired blocks on a fixed cadence and republish the store size.
///
/// Lazy deletion on reads keeps hot entries honest; this loop keeps a quiet
/// store from holding dead ones indefinitely. Runs until the shutdown
/// signal fires.
pub async fn run_sweeper(
    denylist: Denylist,
    metrics: Arc<dyn MetricsSink>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                denylist.cleanup_expired();
                let size = denylist.size();
                metrics.set_denylist_size(size);
                tracing::trace!(size, "Denylist sweep complete");
            }
            _ = shutdown.recv() => {
                tracing::debug!("Denylist sweeper stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Captures gauge updates instead of forwarding them to a recorder.
    struct RecordingSink {
        sizes: Mutex<Vec<usize>>,
    }

    impl MetricsSink for RecordingSink {
        fn record_request(&self, _method: &str, _route: &str, _status: u16) {}
        fn observe_duration(&self, _method: &str, _route: &str, _status: u16, _seconds: f64) {}
        fn record_blocked(&self, _route: &str) {}
        fn record_auth_failure(&self) {}
        fn set_denylist_size(&self, size: usize) {
            self.sizes.lock().unwrap().push(size);
        }
    }

    #[tokio::test]
    async fn test_sweeper_purges_and_republishes_size() {
        let denylist = Denylist::new();
        denylist.add("203.0.113.5", -1.0, "already expired");
        denylist.add("203.0.113.6", 300.0, "still live");

        let sink = Arc::new(RecordingSink {
            sizes: Mutex::new(Vec::new()),
        });
        let (tx, rx) = broadcast::channel(1);

        let sweeper = tokio::spawn(run_sweeper(
            denylist.clone(),
            sink.clone(),
            Duration::from_millis(10),
            rx,
        ));

        time::sleep(Duration::from_millis(35)).await;
        tx.send(()).unwrap();
        sweeper.await.unwrap();

        let sizes = sink.sizes.lock().unwrap();
        assert!(!sizes.is_empty(), "sweeper should have published at least once");
        assert!(
            sizes.iter().all(|&size| size == 1),
            "expired entry must never be counted: {sizes:?}"
        );
        assert!(denylist.get("203.0.113.5").is_none());
        assert!(denylist.get("203.0.113.6").is_some());
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_shutdown() {
        let denylist = Denylist::new();
        let sink = Arc::new(RecordingSink {
            sizes: Mutex::new(Vec::new()),
        });
        let (tx, rx) = broadcast::channel(1);

        let sweeper = tokio::spawn(run_sweeper(
            denylist,
            sink,
            Duration::from_secs(3600),
            rx,
        ));

        tx.send(()).unwrap();
        time::timeout(Duration::from_secs(1), sweeper)
            .await
            .expect("sweeper should exit promptly on shutdown")
            .unwrap();
    }
}
