//! Lifecycle management subsystem.

pub mod shutdown;

pub use shutdown::Shutdown;
