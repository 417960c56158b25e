//! Operational mode and the crash latch.

use std::sync::atomic::{AtomicU8, Ordering};

const SERVING: u8 = 0;
const FAILED: u8 = 1;

/// Whether the process is serving traffic or simulating total failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationalMode {
    Serving,
    Failed,
}

/// One-way latch from [`OperationalMode::Serving`] to
/// [`OperationalMode::Failed`].
///
/// Once tripped, the gate answers every request with a fixed 500 until the
/// process restarts. There is no transition back; resurrection is a
/// restart's job.
#[derive(Debug, Default)]
pub struct OperationalState {
    mode: AtomicU8,
}

impl OperationalState {
    pub fn new() -> Self {
        Self {
            mode: AtomicU8::new(SERVING),
        }
    }

    pub fn mode(&self) -> OperationalMode {
        match self.mode.load(Ordering::SeqCst) {
            FAILED => OperationalMode::Failed,
            _ => OperationalMode::Serving,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.mode() == OperationalMode::Failed
    }

    /// Trip the latch.
    pub fn fail(&self) {
        self.mode.store(FAILED, Ordering::SeqCst);
    }
}
