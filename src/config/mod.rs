//! Client settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI flags override individual fields
//!     → ClientConfig (endpoints, timeout, logging)
//!
//! defaults document (JSON file or stdin)
//!     → loader.rs (read text only)
//!     → tree::ConfigBuilder (parse, non-fatal on error)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the client runs with no settings file
//! - Validation separates syntactic (serde) from semantic checks
//! - Settings errors are fatal at startup; defaults-document parse errors are not

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{ClientConfig, EndpointsConfig, LogFormat, LoggingConfig};
