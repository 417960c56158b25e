//! Edge-filtering gate for the auction demo service.
//!
//! Resolves the real client address behind one tier of trusted proxies,
//! enforces a TTL-based denylist ahead of every route, and exposes a
//! bearer-token management interface plus Prometheus metrics on the same
//! listener.

pub mod app;
pub mod config;
pub mod denylist;
pub mod gate;
pub mod http;
pub mod identity;
pub mod internal;
pub mod lifecycle;
pub mod observability;

pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
