//! HTTP protocol handling subsystem.

pub mod request_id;
pub mod server;

pub use request_id::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
