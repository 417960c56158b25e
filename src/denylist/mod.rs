//! Denylist subsystem.
//!
//! # Responsibilities
//! - Hold active address blocks with per-entry TTLs
//! - Guarantee no query ever reports an expired block
//! - Sweep the store periodically so idle entries are reclaimed too

pub mod store;
pub mod sweep;

pub use store::{BlockEntry, Denylist};
