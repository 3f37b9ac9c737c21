//! Evaluation runner for lab submissions.
//!
//! # Architecture
//!
//! ```text
//! Submission dir → LabRunner → TaskExecutor (per task) → TaskOutcome
//!                      └─ aggregates into LabOutcome
//! ```
//!
//! The runner:
//! 1. Validates the submission directory
//! 2. Discovers grading programs for the lab, ordered by task number
//! 3. Executes them strictly sequentially with a bounded timeout
//! 4. Aggregates per-task outcomes into a lab-level pass/fail

pub mod config;
pub mod discovery;
pub mod executor;
pub mod lab;
pub mod result;

pub use config::{ExecutorConfig, DEFAULT_TASK_TIMEOUT};
pub use discovery::{available_labs, discover_tasks, TaskProgram};
pub use executor::TaskExecutor;
pub use lab::LabRunner;
pub use result::{FailureReason, LabOutcome, TaskOutcome, TaskOutcomes};
