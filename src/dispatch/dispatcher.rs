//! Bounded request/reply dispatcher.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::dispatch::DispatchResult;
use crate::net::{ControlChannel, ControlEndpoint};
use crate::protocol::{IpcMessage, MessageIdGenerator};

/// Result of a single send.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A reply arrived within the timeout.
    Reply(IpcMessage),
    /// Nothing arrived within the timeout.
    NoReply,
}

impl Outcome {
    pub fn reply(&self) -> Option<&IpcMessage> {
        match self {
            Outcome::Reply(msg) => Some(msg),
            Outcome::NoReply => None,
        }
    }

    pub fn into_reply(self) -> Option<IpcMessage> {
        match self {
            Outcome::Reply(msg) => Some(msg),
            Outcome::NoReply => None,
        }
    }
}

/// Sends commands one at a time, each with a single bounded wait for its reply.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    ids: MessageIdGenerator,
    timeout: Duration,
}

impl CommandDispatcher {
    pub fn new(timeout: Duration) -> Self {
        Self::with_ids(timeout, MessageIdGenerator::new())
    }

    pub fn with_ids(timeout: Duration, ids: MessageIdGenerator) -> Self {
        Self { ids, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Id of the most recently sent command.
    pub fn last_id(&self) -> u32 {
        self.ids.current()
    }

    /// Send `command` on `endpoint` and wait up to the configured timeout for one reply.
    pub async fn send<C: ControlChannel>(
        &mut self,
        endpoint: &mut ControlEndpoint<C>,
        command: &str,
        params: Option<Map<String, Value>>,
    ) -> DispatchResult<Outcome> {
        let id = self.ids.next_id();
        let frame = IpcMessage::command(command, id, params).encode()?;

        tracing::trace!(endpoint = %endpoint.name(), command, id, "Sending command");
        endpoint.channel_mut().send(&frame).await?;

        let Some(raw) = endpoint.channel_mut().recv_within(self.timeout).await? else {
            tracing::warn!(
                endpoint = %endpoint.name(),
                command,
                id,
                timeout_ms = self.timeout.as_millis() as u64,
                "No reply received within timeout"
            );
            return Ok(Outcome::NoReply);
        };

        let reply = IpcMessage::decode(&raw)?;
        if reply.id != id {
            tracing::warn!(
                endpoint = %endpoint.name(),
                expected = id,
                received = reply.id,
                "Reply id does not match request, possibly a stale reply"
            );
        }
        Ok(Outcome::Reply(reply))
    }

    /// Send a `configure` command carrying `params`.
    pub async fn configure<C: ControlChannel>(
        &mut self,
        endpoint: &mut ControlEndpoint<C>,
        params: Map<String, Value>,
    ) -> DispatchResult<Outcome> {
        self.send(endpoint, "configure", Some(params)).await
    }

    /// Send a `status` request.
    pub async fn status<C: ControlChannel>(
        &mut self,
        endpoint: &mut ControlEndpoint<C>,
    ) -> DispatchResult<Outcome> {
        self.send(endpoint, "status", None).await
    }
}
