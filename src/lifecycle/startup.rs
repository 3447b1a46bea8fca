//! Startup: connect both control endpoints.
//!
//! # Design Decisions
//! - Fail fast: the client cannot operate without both endpoints
//! - Connects are bounded by the same timeout used for replies

use std::time::Duration;

use thiserror::Error;

use crate::config::ClientConfig;
use crate::net::{ChannelError, ControlEndpoint, EndpointAddress, TcpControlChannel};
use crate::orchestrator::Orchestrator;

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Cannot reach frame {name}: {source}")]
    Endpoint {
        name: &'static str,
        #[source]
        source: ChannelError,
    },
}

/// Connect one named endpoint.
pub async fn connect_endpoint(
    name: &'static str,
    address: &str,
    timeout: Duration,
) -> Result<ControlEndpoint<TcpControlChannel>, StartupError> {
    let wrap = |source| StartupError::Endpoint { name, source };

    let address: EndpointAddress = address.parse().map_err(wrap)?;
    let channel = TcpControlChannel::connect(&address, timeout)
        .await
        .map_err(wrap)?;

    tracing::info!(endpoint = name, address = %address, "Control endpoint connected");
    Ok(ControlEndpoint::new(name, channel))
}

/// Connect the receiver and processor endpoints and build the orchestrator.
pub async fn connect(config: &ClientConfig) -> Result<Orchestrator<TcpControlChannel>, StartupError> {
    let timeout = Duration::from_millis(config.timeout_ms);

    let receiver = connect_endpoint("receiver", &config.endpoints.receiver, timeout).await?;
    let processor = connect_endpoint("processor", &config.endpoints.processor, timeout).await?;

    Ok(Orchestrator::new(receiver, processor, timeout))
}
