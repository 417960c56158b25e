//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Load configuration: the TOML file if given, otherwise defaults, then
/// environment overrides, then semantic validation.
pub fn load_config(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GateConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay `HOST`, `PORT` and `GATE_INTERNAL_KEY` on top of file values.
/// Empty variables are treated as unset.
pub fn apply_env_overrides(config: &mut GateConfig) {
    let (mut host, mut port) = match config.listener.bind_address.rsplit_once(':') {
        Some((host, port)) => (host.to_string(), port.to_string()),
        None => (config.listener.bind_address.clone(), String::new()),
    };

    if let Ok(value) = std::env::var("HOST") {
        if !value.is_empty() {
            host = value;
        }
    }
    if let Ok(value) = std::env::var("PORT") {
        if !value.is_empty() {
            port = value;
        }
    }
    config.listener.bind_address = format!("{host}:{port}");

    if let Ok(value) = std::env::var("GATE_INTERNAL_KEY") {
        if !value.is_empty() {
            config.internal.api_key = value;
        }
    }
}
