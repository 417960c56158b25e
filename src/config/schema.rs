//! Configuration schema definitions.
//!
//! Every section has defaults so a minimal file, or no file at all, yields
//! a runnable configuration. All types derive Serde traits for
//! deserialization from TOML.

use serde::{Deserialize, Serialize};

/// Root configuration for the gate service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub listener: ListenerConfig,
    pub gate: GateSettings,
    pub internal: InternalApiConfig,
    pub denylist: DenylistConfig,
    pub timeouts: TimeoutConfig,
    pub app: AppConfig,
}

/// Listener socket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address the HTTP listener binds, overridable via `HOST`/`PORT`.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Gate middleware settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    /// Paths that bypass denylist enforcement. Matched exactly.
    pub exempt_paths: Vec<String>,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            exempt_paths: vec!["/health".to_string(), "/metrics".to_string()],
        }
    }
}

/// Privileged management interface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalApiConfig {
    /// Bearer token for the management endpoints. Usually injected via
    /// `GATE_INTERNAL_KEY` rather than committed to a file.
    pub api_key: String,
    /// Route prefix whose endpoints carry their own authorization instead
    /// of the denylist check.
    pub path_prefix: String,
}

impl Default for InternalApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            path_prefix: "/internal".to_string(),
        }
    }
}

/// Denylist store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DenylistConfig {
    /// Seconds between background purges of expired blocks.
    pub sweep_interval_secs: u64,
}

impl Default for DenylistConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 10,
        }
    }
}

/// Request handling timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Settings for the protected demo application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding signup/login accounts.
    pub users_path: String,
    /// Upper bound of the simulated bid-processing delay. Zero disables
    /// the delay entirely.
    pub max_bid_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            users_path: "data/users.json".to_string(),
            max_bid_delay_ms: 50,
        }
    }
}
