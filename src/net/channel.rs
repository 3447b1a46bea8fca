//! Control channel transport.
//!
//! # Responsibilities
//! - Connect to a target's control endpoint
//! - Write one encoded message per line
//! - Wait a bounded time for one reply line

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};
use uuid::Uuid;

use crate::net::{ChannelError, ChannelResult, EndpointAddress};

const READ_CHUNK: usize = 4096;

/// A bidirectional request/reply channel to one target process.
#[allow(async_fn_in_trait)]
pub trait ControlChannel {
    /// Identity string used in logs.
    fn identity(&self) -> &str;

    /// Transmit one encoded message.
    async fn send(&mut self, frame: &str) -> ChannelResult<()>;

    /// Wait at most `timeout` for one message. `Ok(None)` means nothing arrived in time.
    async fn recv_within(&mut self, timeout: Duration) -> ChannelResult<Option<String>>;
}

/// Newline-delimited JSON over TCP.
#[derive(Debug)]
pub struct TcpControlChannel {
    stream: TcpStream,
    identity: String,
    /// Bytes read past the last complete line.
    pending: Vec<u8>,
}

impl TcpControlChannel {
    /// Connect to `address`, giving up after `timeout`.
    pub async fn connect(address: &EndpointAddress, timeout: Duration) -> ChannelResult<Self> {
        let target = address.authority();
        let stream = match time::timeout(timeout, TcpStream::connect(&target)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(ChannelError::Connect {
                    address: address.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(ChannelError::ConnectTimeout {
                    address: address.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        };
        stream.set_nodelay(true)?;

        let identity = Uuid::new_v4().to_string();
        tracing::debug!(endpoint = %address, identity = %identity, "Control channel connected");

        Ok(Self {
            stream,
            identity,
            pending: Vec::new(),
        })
    }

    /// Split the next complete, non-blank line off the pending buffer.
    fn take_line(&mut self) -> Option<String> {
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line).trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
        None
    }
}

impl ControlChannel for TcpControlChannel {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn send(&mut self, frame: &str) -> ChannelResult<()> {
        let mut line = Vec::with_capacity(frame.len() + 1);
        line.extend_from_slice(frame.as_bytes());
        line.push(b'\n');
        self.stream.write_all(&line).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn recv_within(&mut self, timeout: Duration) -> ChannelResult<Option<String>> {
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }

            // `read` is cancel safe, so a deadline hit mid-line keeps what arrived
            match time::timeout_at(deadline, self.stream.read(&mut chunk)).await {
                Err(_) => return Ok(None),
                Ok(Ok(0)) => return Err(ChannelError::Closed),
                Ok(Ok(n)) => self.pending.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) => return Err(ChannelError::Io(e)),
            }
        }
    }
}
