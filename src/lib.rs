//! labmark: evaluates student lab submissions and maintains a markdown
//! leaderboard.
//!
//! The runner executes per-task grading scripts as isolated child processes
//! and aggregates pass/fail outcomes; the leaderboard engine reconciles
//! those outcomes with the persisted table, recomputes rankings, and
//! re-serializes the document.

pub mod cli;
pub mod error;
pub mod leaderboard;
pub mod pipeline;
pub mod runner;

// Re-export commonly used types
pub use error::{SubmissionError, TableError};
pub use pipeline::{EvalConfig, EvalReport, Orchestrator, OrchestratorError};
pub use runner::{FailureReason, LabOutcome, LabRunner, TaskExecutor, TaskOutcome, TaskOutcomes};
