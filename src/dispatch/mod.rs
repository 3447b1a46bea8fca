//! Command dispatch over a control endpoint.
//!
//! # Data Flow
//! ```text
//! (endpoint, command, params?)
//!     → MessageIdGenerator::next_id
//!     → IpcMessage::command → encode
//!     → ControlChannel::send
//!     → ControlChannel::recv_within(timeout)
//!     → Outcome::Reply(decoded) | Outcome::NoReply
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per send; nothing is retried
//! - A timeout is an outcome, not an error
//! - One command in flight at a time, so ids never collide with an outstanding reply

pub mod dispatcher;

pub use dispatcher::{CommandDispatcher, Outcome};

use thiserror::Error;

use crate::net::ChannelError;
use crate::protocol::ProtocolError;

/// Failures while sending a command or reading its reply.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
