//! Configuration management subsystem.
//!
//! # Responsibilities
//! - Define the configuration schema with serde defaults
//! - Load TOML from disk and overlay environment variables
//! - Validate semantics before the server ever binds

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GateConfig;
pub use validation::{validate_config, ValidationError};
