//! Client settings schema.
//!
//! All types derive Serde traits so settings can be read from a TOML file; every field
//! has a default so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

/// Root settings for the control client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Control endpoint addresses.
    pub endpoints: EndpointsConfig,

    /// Reply timeout applied to every command, in milliseconds.
    pub timeout_ms: u64,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointsConfig::default(),
            timeout_ms: 1000,
            logging: LoggingConfig::default(),
        }
    }
}

/// Control endpoint addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Frame receiver control endpoint (e.g., "tcp://127.0.0.1:5000").
    pub receiver: String,

    /// Frame processor control endpoint (e.g., "tcp://127.0.0.1:5004").
    pub processor: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            receiver: "tcp://127.0.0.1:5000".to_string(),
            processor: "tcp://127.0.0.1:5004".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}
