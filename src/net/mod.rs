//! Network layer for the control channels.
//!
//! # Data Flow
//! ```text
//! "tcp://host:port"
//!     → endpoint.rs (EndpointAddress parse)
//!     → channel.rs (TcpControlChannel::connect)
//!     → ControlEndpoint { name, channel } owned by the orchestrator
//! ```
//!
//! # Design Decisions
//! - One JSON message per newline-terminated line
//! - Reads are bounded by a deadline and never lose partially received lines
//! - The `ControlChannel` trait is the only seam the dispatcher depends on

pub mod channel;
pub mod endpoint;

pub use channel::{ControlChannel, TcpControlChannel};
pub use endpoint::{ControlEndpoint, EndpointAddress};

use thiserror::Error;

/// Errors raised by a control channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Endpoint address could not be parsed.
    #[error("Invalid endpoint '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// TCP connect failed.
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// TCP connect did not complete in time.
    #[error("Connect to {address} timed out after {timeout_ms} ms")]
    ConnectTimeout { address: String, timeout_ms: u64 },

    /// Read or write failure on an established channel.
    #[error("Channel IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer closed the channel.
    #[error("Channel closed by peer")]
    Closed,
}

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;
