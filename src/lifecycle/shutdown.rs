//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcast-based shutdown coordinator.
///
/// Long-running tasks subscribe; [`trigger`](Shutdown::trigger) fans the
/// signal out to all of them at once.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the shutdown signal. Subscribers that already exited are fine;
    /// the send result is deliberately ignored.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trip the coordinator when Ctrl+C arrives.
    pub fn listen_for_ctrl_c(&self) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = tx.send(());
            }
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
