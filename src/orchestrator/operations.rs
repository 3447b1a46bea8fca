//! Composite operations over the receiver and processor endpoints.

use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time;

use crate::dispatch::{CommandDispatcher, DispatchResult, Outcome};
use crate::net::{ControlChannel, ControlEndpoint};
use crate::orchestrator::RunPlan;
use crate::tree::{ConfigBuilder, TreeResult};

/// Number of status requests in the settling poll.
pub const SETTLING_POLLS: usize = 10;

/// Pause after each settling poll.
pub const SETTLING_DELAY: Duration = Duration::from_millis(200);

/// Drives the receiver and processor through the requested operations.
pub struct Orchestrator<C> {
    builder: ConfigBuilder,
    dispatcher: CommandDispatcher,
    receiver: ControlEndpoint<C>,
    processor: ControlEndpoint<C>,
}

impl<C: ControlChannel> Orchestrator<C> {
    pub fn new(receiver: ControlEndpoint<C>, processor: ControlEndpoint<C>, timeout: Duration) -> Self {
        Self::with_dispatcher(receiver, processor, CommandDispatcher::new(timeout))
    }

    pub fn with_dispatcher(
        receiver: ControlEndpoint<C>,
        processor: ControlEndpoint<C>,
        dispatcher: CommandDispatcher,
    ) -> Self {
        Self {
            builder: ConfigBuilder::new(),
            dispatcher,
            receiver,
            processor,
        }
    }

    pub fn builder(&self) -> &ConfigBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut ConfigBuilder {
        &mut self.builder
    }

    pub fn receiver(&self) -> &ControlEndpoint<C> {
        &self.receiver
    }

    pub fn processor(&self) -> &ControlEndpoint<C> {
        &self.processor
    }

    /// Run every operation `plan` selects, in the fixed order.
    pub async fn run(&mut self, plan: &RunPlan) -> TreeResult<()> {
        tracing::info!("Odin data client starting up");
        tracing::debug!(
            identity = %self.receiver.channel().identity(),
            "Frame receiver control channel identity"
        );
        tracing::debug!(
            identity = %self.processor.channel().identity(),
            "Frame processor control channel identity"
        );

        if let Some(text) = &plan.defaults {
            self.load_defaults(text);
        }
        self.apply_overrides(plan)?;

        if plan.configure {
            self.push_configuration().await;
        }
        if let Some(file_writing) = plan.file_writing {
            self.set_file_writing(file_writing.enabled()).await?;
        }
        if plan.status {
            self.status().await;
        }
        if plan.get_config {
            self.request_configuration().await;
        }
        if plan.get_version {
            self.request_version().await;
        }
        if plan.reset_stats {
            self.reset_statistics().await;
        }
        if plan.shutdown {
            self.shutdown().await;
        }
        Ok(())
    }

    /// Install a defaults document. Returns false (and logs) when it is malformed.
    pub fn load_defaults(&mut self, text: &str) -> bool {
        tracing::debug!("Parsing default configuration");
        match self.builder.load_defaults(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse configuration file");
                false
            }
        }
    }

    /// Apply frame, bitdepth, path and name overrides, in that order.
    pub fn apply_overrides(&mut self, plan: &RunPlan) -> TreeResult<()> {
        if let Some(frames) = plan.frames {
            self.builder.set_num_frames(frames)?;
        }
        if let Some(bitdepth) = plan.bitdepth {
            self.builder.set_bitdepth(bitdepth.bits())?;
        }
        if let Some(path) = &plan.file_path {
            self.builder.set_file_path(path)?;
        }
        if let Some(name) = &plan.file_name {
            self.builder.set_file_name(name)?;
        }
        Ok(())
    }

    /// Push the receiver tree, `fr_setup`, settling poll, plugin chain and processor tree.
    pub async fn push_configuration(&mut self) {
        tracing::info!("Sending configuration command to frame receiver");
        let params = self.builder.receiver().as_map().clone();
        let result = self.dispatcher.configure(&mut self.receiver, params).await;
        report(self.receiver.name(), "configure", result);

        if let Some(fr_setup) = self.builder.processor().get(&["fr_setup"]).cloned() {
            tracing::info!("Sending receiver plugin configuration command to frame processor");
            let mut params = Map::new();
            params.insert("fr_setup".to_string(), fr_setup);
            let result = self.dispatcher.configure(&mut self.processor, params).await;
            report(self.processor.name(), "configure", result);
        }

        // Runs the full count whatever the replies say; there is no early exit.
        for poll in 1..=SETTLING_POLLS {
            match self.dispatcher.status(&mut self.processor).await {
                Ok(Outcome::Reply(reply)) => match reply.get_param("shared_memory") {
                    Some(shared_memory) => {
                        tracing::info!(poll, shared_memory = %shared_memory, "Processor shared memory status")
                    }
                    None => tracing::debug!(poll, "Status reply has no shared_memory parameter"),
                },
                Ok(Outcome::NoReply) => {}
                Err(e) => tracing::error!(poll, error = %e, "Settling status poll failed"),
            }
            time::sleep(SETTLING_DELAY).await;
        }

        let plugins = self.builder.plugins().to_vec();
        if !plugins.is_empty() {
            tracing::info!(
                count = plugins.len(),
                "Sending plugin chain configuration commands to frame processor"
            );
            for plugin in plugins {
                let result = self.dispatcher.configure(&mut self.processor, plugin).await;
                report(self.processor.name(), "configure", result);
            }
        }

        tracing::info!("Sending plugin parameter configuration command to frame processor");
        let params = self.builder.processor().as_map().clone();
        let result = self.dispatcher.configure(&mut self.processor, params).await;
        report(self.processor.name(), "configure", result);
    }

    /// Enable or disable processor file writing, sending only the `hdf` subtree.
    pub async fn set_file_writing(&mut self, enabled: bool) -> TreeResult<()> {
        let params = self.builder.file_writing_params(enabled)?;

        tracing::info!(
            "Sending file writing {} command to frame processor",
            if enabled { "enable" } else { "disable" }
        );
        let result = self.dispatcher.configure(&mut self.processor, params).await;
        report(self.processor.name(), "file writing", result);
        Ok(())
    }

    /// Request status from the receiver, then the processor.
    pub async fn status(&mut self) {
        self.broadcast("status", "status request").await;
    }

    pub async fn request_configuration(&mut self) {
        self.broadcast("request_configuration", "configuration request").await;
    }

    pub async fn request_version(&mut self) {
        self.broadcast("request_version", "version request").await;
    }

    pub async fn reset_statistics(&mut self) {
        self.broadcast("reset_statistics", "statistics reset").await;
    }

    /// Shut down the receiver, then ask the processor to shut down via `configure`.
    pub async fn shutdown(&mut self) {
        tracing::info!("Sending shutdown command to frame receiver");
        let result = self.dispatcher.send(&mut self.receiver, "shutdown", None).await;
        report(self.receiver.name(), "shutdown", result);

        tracing::info!("Sending shutdown config request to frame processor");
        let mut params = Map::new();
        params.insert("shutdown".to_string(), Value::Bool(true));
        let result = self.dispatcher.configure(&mut self.processor, params).await;
        report(self.processor.name(), "shutdown", result);
    }

    async fn broadcast(&mut self, command: &str, description: &str) {
        for endpoint in [&mut self.receiver, &mut self.processor] {
            tracing::info!("Sending {} command to frame {}", description, endpoint.name());
            let result = self.dispatcher.send(endpoint, command, None).await;
            report(endpoint.name(), description, result);
        }
    }
}

/// Log the outcome of one send. Missing replies are already logged by the dispatcher.
fn report(endpoint: &str, description: &str, result: DispatchResult<Outcome>) {
    match result {
        Ok(Outcome::Reply(reply)) => {
            if reply.is_nack() {
                tracing::warn!(
                    endpoint,
                    error = ?reply.get_param("error"),
                    "Got rejection for {}: {}",
                    description,
                    reply
                );
            } else {
                tracing::info!(endpoint, "Got response: {}", reply);
            }
        }
        Ok(Outcome::NoReply) => {}
        Err(e) => {
            tracing::error!(endpoint, error = %e, "Failed to send {} command", description);
        }
    }
}
