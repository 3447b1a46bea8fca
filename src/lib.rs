//! Control-plane client for the odin-data frame receiver and frame processor.

pub mod config;
pub mod dispatch;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod orchestrator;
pub mod protocol;
pub mod tree;

pub use config::ClientConfig;
pub use dispatch::{CommandDispatcher, Outcome};
pub use orchestrator::{Orchestrator, RunPlan};
pub use tree::ConfigBuilder;
