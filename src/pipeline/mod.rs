//! Evaluation pipeline: configuration and run orchestration.

pub mod config;
pub mod orchestrator;

pub use config::EvalConfig;
pub use orchestrator::{EvalReport, Orchestrator, OrchestratorError};
