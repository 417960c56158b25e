//! Edge gate subsystem.
//!
//! # Responsibilities
//! - Wrap every route, resolved identity in hand, and short-circuit
//!   blocked callers before any handler runs
//! - Leave privileged `/internal` paths to their own authorization
//! - Hold the process-wide crash latch
//! - Feed the request, block and duration metrics

pub mod exempt;
pub mod middleware;
pub mod ops;

pub use exempt::ExemptPaths;
pub use middleware::gate_middleware;
pub use ops::{OperationalMode, OperationalState};
