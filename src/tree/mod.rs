//! Configuration tree subsystem.
//!
//! # Data Flow
//! ```text
//! defaults document (JSON)
//!     → defaults.rs (parse optional top-level sections)
//!     → builder.rs (replace receiver tree / processor tree / plugin chain)
//!
//! CLI overrides (frames, bitdepth, path, name):
//!     → builder.rs (update SessionState)
//!     → section.rs (ensure every intermediate section, write the leaf)
//! ```
//!
//! # Design Decisions
//! - SessionState is the single source of truth for frames/path/name; tree leaves
//!   are re-derived from it on every mutation
//! - Section creation is idempotent and never replaces an existing section
//! - A path that crosses a non-mapping value is an error, not an overwrite

pub mod bitdepth;
pub mod builder;
pub mod defaults;
pub mod section;

pub use bitdepth::Bitdepth;
pub use builder::{ConfigBuilder, SessionState};
pub use defaults::DefaultsDocument;
pub use section::ConfigTree;

use thiserror::Error;

/// Errors raised while building configuration trees.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Bitdepth outside the supported table.
    #[error("Unsupported bitdepth {0}, expected one of 1, 6, 12, 24")]
    InvalidBitdepth(u32),

    /// A path component exists but is not a mapping.
    #[error("Config key '{path}' exists but is not a section")]
    NotASection { path: String },

    /// The defaults document could not be parsed.
    #[error("Malformed defaults document: {0}")]
    MalformedDefaults(#[from] serde_json::Error),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
