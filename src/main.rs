//! ODIN data control client.
//!
//! Configures and operates a frame receiver and a frame processor over their
//! control channels.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI flags ──┐
//!   settings ───┼─▶ config ──▶ lifecycle::startup ──▶ Orchestrator
//!   defaults ───┘                (connect both)            │
//!                                                          │ RunPlan
//!                     ┌────────────────────────────────────┤
//!                     ▼                                    ▼
//!              ┌─────────────┐                     ┌──────────────┐
//!              │    tree     │                     │   dispatch   │
//!              │ ConfigBuilder│                    │ id + timeout │
//!              └─────────────┘                     └──────┬───────┘
//!                                                         │ one JSON line per message
//!                                        ┌────────────────┴───────────────┐
//!                                        ▼                                ▼
//!                                 frame receiver                   frame processor
//! ```

use std::path::PathBuf;

use clap::Parser;

use odin_data_client::config::loader::{load_or_default, read_defaults_document};
use odin_data_client::config::validation::validate_config;
use odin_data_client::config::{ClientConfig, ConfigError, LogFormat};
use odin_data_client::lifecycle;
use odin_data_client::observability::init_logging;
use odin_data_client::orchestrator::{FileWriting, RunPlan};
use odin_data_client::tree::Bitdepth;

#[derive(Parser, Debug)]
#[command(name = "odin-data-client")]
#[command(about = "ODIN data client", long_about = None)]
struct Cli {
    /// Frame receiver control channel endpoint URL
    #[arg(long = "frctrl")]
    fr_ctrl_endpoint: Option<String>,

    /// Frame processor control channel endpoint URL
    #[arg(long = "fpctrl")]
    fp_ctrl_endpoint: Option<String>,

    /// Control channel reply timeout in ms
    #[arg(long = "timeout")]
    timeout_ms: Option<u64>,

    /// TOML settings file for endpoints, timeout and logging
    #[arg(long)]
    settings: Option<PathBuf>,

    /// JSON defaults document to load; reads stdin when given without a value
    #[arg(long = "default", num_args = 0..=1, default_missing_value = "-")]
    config_file: Option<PathBuf>,

    /// Send a configuration command to the processes
    #[arg(long)]
    config: bool,

    /// Override the number of frames in configuration
    #[arg(long)]
    frames: Option<u64>,

    /// Override the bit depth param in configuration (1, 6, 12 or 24)
    #[arg(long)]
    bitdepth: Option<Bitdepth>,

    /// Start frame processor file writing
    #[arg(long, conflicts_with = "stop")]
    start: bool,

    /// Stop frame processor file writing
    #[arg(long)]
    stop: bool,

    /// Set file writing path
    #[arg(long = "path")]
    file_path: Option<String>,

    /// Set file writing name
    #[arg(long = "file")]
    file_name: Option<String>,

    /// Request a status report from the processes
    #[arg(long)]
    status: bool,

    /// Get the current configuration of the processes
    #[arg(long)]
    getconfig: bool,

    /// Get the current version information from the processes
    #[arg(long)]
    version: bool,

    /// Send a statistics reset command to the processes
    #[arg(long = "reset_stats", alias = "reset-stats")]
    reset_stats: bool,

    /// Instruct the processes to shut down
    #[arg(long)]
    shutdown: bool,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    /// Settings file values with command-line overrides applied.
    fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = load_or_default(self.settings.as_deref())?;

        if let Some(endpoint) = &self.fr_ctrl_endpoint {
            config.endpoints.receiver = endpoint.clone();
        }
        if let Some(endpoint) = &self.fp_ctrl_endpoint {
            config.endpoints.processor = endpoint.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn run_plan(&self, defaults: Option<String>) -> RunPlan {
        let file_writing = if self.start {
            Some(FileWriting::Start)
        } else if self.stop {
            Some(FileWriting::Stop)
        } else {
            None
        };

        RunPlan {
            defaults,
            frames: self.frames,
            bitdepth: self.bitdepth,
            file_path: self.file_path.clone(),
            file_name: self.file_name.clone(),
            configure: self.config,
            file_writing,
            status: self.status,
            get_config: self.getconfig,
            get_version: self.version,
            reset_stats: self.reset_stats,
            shutdown: self.shutdown,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.client_config()?;

    init_logging(&config.logging)?;

    tracing::info!(
        receiver = %config.endpoints.receiver,
        processor = %config.endpoints.processor,
        timeout_ms = config.timeout_ms,
        "Configuration loaded"
    );

    let defaults = match &cli.config_file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Reading default configuration");
            Some(read_defaults_document(path)?)
        }
        None => None,
    };
    let plan = cli.run_plan(defaults);
    if plan.sends_nothing() {
        tracing::warn!("No commands selected, nothing will be sent to the processes");
    }

    let mut orchestrator = lifecycle::connect(&config).await?;
    orchestrator.run(&plan).await?;

    tracing::info!("Client run complete");
    Ok(())
}
