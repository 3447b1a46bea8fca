//! Command orchestration.
//!
//! # Data Flow
//! ```text
//! RunPlan (from the CLI)
//!     → load-defaults        (ConfigBuilder)
//!     → frame/bitdepth/path/name overrides (ConfigBuilder)
//!     → push-configuration   (receiver tree, fr_setup, settling poll, plugins, processor tree)
//!     → start/stop file writing
//!     → status → get-configuration → get-version → reset-statistics → shutdown
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: one command in flight, each with a bounded wait
//! - Every operation is best-effort; a missing reply never aborts later operations
//! - Tree errors (unsupported bitdepth, a scalar where a section is expected) are fatal

pub mod operations;
pub mod plan;

pub use operations::{Orchestrator, SETTLING_DELAY, SETTLING_POLLS};
pub use plan::{FileWriting, RunPlan};
