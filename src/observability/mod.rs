//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (endpoint, command, id)
//!
//! Consumers:
//!     → stdout, pretty or JSON per LoggingConfig
//! ```
//!
//! # Design Decisions
//! - Every non-fatal condition (timeout, bad reply, malformed defaults) leaves a log record
//! - Command ids flow through dispatch logs to correlate requests and replies

pub mod logging;

pub use logging::init_logging;
