//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use odin_data_client::net::{ChannelError, ChannelResult, ControlChannel, ControlEndpoint};
use odin_data_client::protocol::IpcMessage;
use odin_data_client::Orchestrator;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Every message sent by any mock channel, tagged with the endpoint name, in send order.
pub type SentLog = Arc<Mutex<Vec<(String, IpcMessage)>>>;

/// Decides the reply (if any) to each command a mock channel receives.
pub type Responder = Box<dyn FnMut(&IpcMessage) -> Option<String> + Send>;

/// In-memory control channel that records sends and answers via a responder.
pub struct MockChannel {
    name: String,
    log: SentLog,
    responder: Responder,
    pending: VecDeque<String>,
    /// When set, every send fails as if the peer had gone away.
    pub broken: bool,
}

impl MockChannel {
    pub fn new(name: &str, log: SentLog, responder: Responder) -> Self {
        Self {
            name: name.to_string(),
            log,
            responder,
            pending: VecDeque::new(),
            broken: false,
        }
    }
}

impl ControlChannel for MockChannel {
    fn identity(&self) -> &str {
        &self.name
    }

    async fn send(&mut self, frame: &str) -> ChannelResult<()> {
        if self.broken {
            return Err(ChannelError::Closed);
        }
        let msg = IpcMessage::decode(frame).expect("client sent an undecodable frame");
        if let Some(reply) = (self.responder)(&msg) {
            self.pending.push_back(reply);
        }
        self.log.lock().unwrap().push((self.name.clone(), msg));
        Ok(())
    }

    async fn recv_within(&mut self, timeout: Duration) -> ChannelResult<Option<String>> {
        match self.pending.pop_front() {
            Some(reply) => Ok(Some(reply)),
            None => {
                tokio::time::sleep(timeout).await;
                Ok(None)
            }
        }
    }
}

/// Responder that acks every command.
pub fn ack_all() -> Responder {
    Box::new(|msg: &IpcMessage| Some(msg.ack(None).encode().unwrap()))
}

/// Responder that never answers.
pub fn silent() -> Responder {
    Box::new(|_: &IpcMessage| None)
}

/// Orchestrator over two mock channels sharing one sent log.
pub fn mock_orchestrator(
    receiver: Responder,
    processor: Responder,
    timeout: Duration,
) -> (Orchestrator<MockChannel>, SentLog) {
    let log: SentLog = Arc::new(Mutex::new(Vec::new()));
    let orchestrator = Orchestrator::new(
        ControlEndpoint::new("receiver", MockChannel::new("receiver", log.clone(), receiver)),
        ControlEndpoint::new("processor", MockChannel::new("processor", log.clone(), processor)),
        timeout,
    );
    (orchestrator, log)
}

/// Snapshot of `(endpoint, command)` pairs in send order.
pub fn commands(log: &SentLog) -> Vec<(String, String)> {
    log.lock()
        .unwrap()
        .iter()
        .map(|(endpoint, msg)| (endpoint.clone(), msg.msg_val.clone()))
        .collect()
}

/// Start a TCP control target that answers each line with `handler`'s reply.
pub async fn start_mock_target<F>(addr: SocketAddr, handler: F)
where
    F: Fn(IpcMessage) -> Option<IpcMessage> + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let (read_half, mut write_half) = socket.into_split();
                        let mut lines = BufReader::new(read_half).lines();
                        while let Ok(Some(line)) = lines.next_line().await {
                            let Ok(request) = IpcMessage::decode(&line) else {
                                continue;
                            };
                            if let Some(reply) = handler(request) {
                                let frame = format!("{}\n", reply.encode().unwrap());
                                if write_half.write_all(frame.as_bytes()).await.is_err() {
                                    break;
                                }
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });
}
