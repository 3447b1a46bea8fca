//! Stand-in frame receiver / frame processor control endpoint.
//!
//! Acknowledges every command the client sends, keeps the configuration it was given,
//! and exits after a `shutdown` command or a `configure` carrying `shutdown: true`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use clap::Parser;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use odin_data_client::config::LoggingConfig;
use odin_data_client::net::EndpointAddress;
use odin_data_client::observability::init_logging;
use odin_data_client::protocol::{IpcMessage, MsgType};

#[derive(Parser)]
#[command(name = "mock-target")]
#[command(about = "Mock control endpoint for the ODIN data client", long_about = None)]
struct Cli {
    /// Endpoint to listen on
    #[arg(short, long, default_value = "tcp://127.0.0.1:5000")]
    endpoint: String,

    /// Name reported in replies (receiver or processor)
    #[arg(short, long, default_value = "receiver")]
    name: String,

    /// Commands to leave unanswered, to exercise client timeouts
    #[arg(long)]
    silent: Vec<String>,
}

struct Target {
    name: String,
    silent: HashSet<String>,
    config: Mutex<Map<String, Value>>,
}

impl Target {
    /// Build the reply to `request` and whether the target should exit afterwards.
    fn respond(&self, request: &IpcMessage) -> (Option<IpcMessage>, bool) {
        if self.silent.contains(&request.msg_val) {
            tracing::info!(command = %request.msg_val, id = request.id, "Leaving command unanswered");
            return (None, false);
        }
        if request.msg_type != MsgType::Cmd {
            return (Some(request.nack("expected a cmd message")), false);
        }

        match request.msg_val.as_str() {
            "configure" => {
                let params = request.params.clone().unwrap_or_default();
                let shutdown = params.get("shutdown") == Some(&Value::Bool(true));
                let mut config = self.config.lock().unwrap_or_else(|e| e.into_inner());
                for (key, value) in params {
                    config.insert(key, value);
                }
                (Some(request.ack(None)), shutdown)
            }
            "status" => {
                let mut params = Map::new();
                params.insert(
                    "shared_memory".to_string(),
                    json!({ "configured": true, "target": self.name }),
                );
                (Some(request.ack(Some(params))), false)
            }
            "request_configuration" => {
                let config = self.config.lock().unwrap_or_else(|e| e.into_inner()).clone();
                (Some(request.ack(Some(config))), false)
            }
            "request_version" => {
                let mut params = Map::new();
                params.insert(
                    "version".to_string(),
                    json!({ "odin-data": env!("CARGO_PKG_VERSION"), "target": self.name }),
                );
                (Some(request.ack(Some(params))), false)
            }
            "reset_statistics" => (Some(request.ack(None)), false),
            "shutdown" => (Some(request.ack(None)), true),
            other => (Some(request.nack(&format!("unknown command '{}'", other))), false),
        }
    }
}

async fn serve(
    target: Arc<Target>,
    stream: TcpStream,
    shutdown: broadcast::Sender<()>,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let request = match IpcMessage::decode(&line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring undecodable message");
                continue;
            }
        };
        tracing::info!(command = %request.msg_val, id = request.id, "Received command");

        let (reply, exit) = target.respond(&request);
        if let Some(reply) = reply {
            match reply.encode() {
                Ok(mut frame) => {
                    frame.push('\n');
                    write_half.write_all(frame.as_bytes()).await?;
                }
                Err(e) => tracing::error!(error = %e, "Failed to encode reply"),
            }
        }
        if exit {
            tracing::info!("Shutdown requested");
            let _ = shutdown.send(());
            break;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig::default())?;

    let address: EndpointAddress = cli.endpoint.parse()?;
    let listener = TcpListener::bind(address.authority()).await?;
    tracing::info!(endpoint = %address, name = %cli.name, "Mock target listening");

    let target = Arc::new(Target {
        name: cli.name,
        silent: cli.silent.into_iter().collect(),
        config: Mutex::new(Map::new()),
    });
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                tracing::debug!(peer_addr = %peer, "Client connected");
                let target = Arc::clone(&target);
                let shutdown = shutdown_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve(target, stream, shutdown).await {
                        tracing::warn!(error = %e, "Connection ended with error");
                    }
                });
            }
            _ = shutdown_rx.recv() => break,
        }
    }

    tracing::info!("Mock target exiting");
    Ok(())
}
