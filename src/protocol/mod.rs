//! Control message protocol.
//!
//! # Data Flow
//! ```text
//! Outgoing:
//!     id.rs (next correlation id)
//!     → message.rs (IpcMessage::command, encode to one JSON line)
//!
//! Incoming:
//!     raw frame → message.rs (decode, named param lookups)
//! ```

pub mod id;
pub mod message;

pub use id::MessageIdGenerator;
pub use message::{IpcMessage, MsgType};

use thiserror::Error;

/// Errors encoding or decoding control messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Failed to encode message: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to decode message: {0}")]
    Decode(serde_json::Error),
}
