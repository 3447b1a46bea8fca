//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load settings → Validate → Connect receiver → Connect processor → Orchestrator
//!
//! Exit:
//!     Orchestrator::run returns → endpoints dropped → process exits
//! ```
//!
//! # Design Decisions
//! - Endpoints are created once and owned by the orchestrator for the whole run
//! - Any startup error is fatal

pub mod startup;

pub use startup::{connect, StartupError};
