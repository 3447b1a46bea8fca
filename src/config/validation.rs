//! Settings validation.
//!
//! # Responsibilities
//! - Check both endpoint addresses parse as `tcp://host:port`
//! - Check the timeout is non-zero
//! - Check the log level is recognised
//!
//! Returns all validation errors, not just the first.

use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::ClientConfig;
use crate::net::EndpointAddress;

/// A single semantic problem with the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{name} endpoint: {reason}")]
    Endpoint { name: &'static str, reason: String },

    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, address) in [
        ("receiver", &config.endpoints.receiver),
        ("processor", &config.endpoints.processor),
    ] {
        if let Err(e) = address.parse::<EndpointAddress>() {
            errors.push(ValidationError::Endpoint {
                name,
                reason: e.to_string(),
            });
        }
    }

    if config.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.logging.level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::LogLevel(config.logging.level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
