//! Configuration validation.
//!
//! Semantic checks on top of what serde already enforced syntactically.
//! All failures are collected and reported together, not just the first.

use thiserror::Error;

use crate::config::schema::GateConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a host:port pair")]
    BindAddress(String),
    #[error("internal.api_key must not be empty; set it in the config file or via GATE_INTERNAL_KEY")]
    MissingApiKey,
    #[error("internal.path_prefix must start with '/' and name a non-root subtree")]
    InternalPrefix,
    #[error("denylist.sweep_interval_secs must be greater than zero")]
    SweepInterval,
    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,
    #[error("gate.exempt_paths entry {0:?} must start with '/'")]
    ExemptPath(String),
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_host_port(&config.listener.bind_address) {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.internal.api_key.is_empty() {
        errors.push(ValidationError::MissingApiKey);
    }

    // The prefix doubles as the router mount point, so the root and
    // trailing slashes are out.
    let prefix = &config.internal.path_prefix;
    if !prefix.starts_with('/') || prefix.len() == 1 || prefix.ends_with('/') {
        errors.push(ValidationError::InternalPrefix);
    }

    if config.denylist.sweep_interval_secs == 0 {
        errors.push(ValidationError::SweepInterval);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    for path in &config.gate.exempt_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::ExemptPath(path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Hostnames are allowed (the listener resolves them at bind time), so
/// this only checks the shape, not that the host parses as an address.
fn is_host_port(addr: &str) -> bool {
    addr.rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GateConfig {
        let mut config = GateConfig::default();
        config.internal.api_key = "secret".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_default_config_requires_api_key() {
        let errors = validate_config(&GateConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingApiKey]);
    }

    #[test]
    fn test_bind_address_shapes() {
        let mut config = valid_config();
        for addr in ["0.0.0.0:3000", "localhost:8080", "[::]:3000"] {
            config.listener.bind_address = addr.to_string();
            assert!(validate_config(&config).is_ok(), "{addr} should be accepted");
        }
        for addr in ["", "no-port", ":3000", "host:notaport", "host:70000"] {
            config.listener.bind_address = addr.to_string();
            assert!(validate_config(&config).is_err(), "{addr} should be rejected");
        }
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut config = GateConfig::default();
        config.listener.bind_address = "bogus".to_string();
        config.denylist.sweep_interval_secs = 0;
        config.timeouts.request_secs = 0;
        config.gate.exempt_paths.push("health".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::MissingApiKey));
        assert!(errors.contains(&ValidationError::SweepInterval));
        assert!(errors.contains(&ValidationError::ExemptPath("health".to_string())));
    }

    #[test]
    fn test_internal_prefix_must_name_a_subtree() {
        let mut config = valid_config();
        for prefix in ["internal", "/", "/internal/"] {
            config.internal.path_prefix = prefix.to_string();
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors, vec![ValidationError::InternalPrefix], "{prefix}");
        }

        config.internal.path_prefix = "/ops".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
