//! Wire envelope for control commands and replies.
//!
//! Requests are encoded as
//! `{"msg_type":"cmd","msg_val":<command>,"id":<u32>,"params":{...}}`, with `params`
//! left out when there is nothing to send. Replies share the same shape; fields this
//! client does not read (e.g. `timestamp`) are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::protocol::ProtocolError;

/// Message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MsgType {
    Cmd,
    Ack,
    Nack,
    Notify,
}

/// A control channel message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    pub msg_type: MsgType,

    /// Command name, e.g. `configure` or `status`.
    pub msg_val: String,

    /// Correlation id.
    pub id: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl IpcMessage {
    /// Build a command message. Empty params are dropped.
    pub fn command(command: &str, id: u32, params: Option<Map<String, Value>>) -> Self {
        Self {
            msg_type: MsgType::Cmd,
            msg_val: command.to_string(),
            id,
            params: params.filter(|p| !p.is_empty()),
        }
    }

    /// Build an `ack` for this message, echoing its command name and id.
    pub fn ack(&self, params: Option<Map<String, Value>>) -> Self {
        Self {
            msg_type: MsgType::Ack,
            msg_val: self.msg_val.clone(),
            id: self.id,
            params,
        }
    }

    /// Build a `nack` for this message carrying an `error` param.
    pub fn nack(&self, error: &str) -> Self {
        let mut params = Map::new();
        params.insert("error".to_string(), Value::String(error.to_string()));
        Self {
            msg_type: MsgType::Nack,
            msg_val: self.msg_val.clone(),
            id: self.id,
            params: Some(params),
        }
    }

    /// Named parameter lookup.
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    pub fn is_nack(&self) -> bool {
        self.msg_type == MsgType::Nack
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(frame.trim()).map_err(ProtocolError::Decode)
    }
}

impl fmt::Display for IpcMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}
