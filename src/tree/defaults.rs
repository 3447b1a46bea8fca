//! Defaults document parsing.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::tree::TreeResult;

/// The three optional top-level sections of a defaults document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsDocument {
    /// Replaces the receiver tree when present.
    pub receiver_default_config: Option<Map<String, Value>>,

    /// Replaces the processor tree when present.
    pub processor_default_config: Option<Map<String, Value>>,

    /// Replaces the plugin chain when present. Order is significant.
    pub processor_plugins: Option<Vec<Map<String, Value>>>,
}

impl DefaultsDocument {
    /// Parse a JSON defaults document.
    ///
    /// Any syntax error, or a section of the wrong shape, rejects the whole document.
    pub fn parse(text: &str) -> TreeResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
