//! Configuration for grading-task execution.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default wall-clock limit for a single grading task.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for running grading programs as child processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Interpreter used to run grading programs.
    pub interpreter: String,
    /// Environment variable the submission directory is prepended to, so
    /// grading programs can import submitted code.
    pub path_var: String,
    /// File extension of grading programs (without the dot).
    pub task_extension: String,
    /// Maximum execution time per task.
    pub timeout: Duration,
}

impl ExecutorConfig {
    /// Creates a configuration with the standard Python grading setup.
    pub fn new() -> Self {
        Self {
            interpreter: "python".to_string(),
            path_var: "PYTHONPATH".to_string(),
            task_extension: "py".to_string(),
            timeout: DEFAULT_TASK_TIMEOUT,
        }
    }

    /// Sets the interpreter.
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Sets the search-path environment variable.
    pub fn with_path_var(mut self, var: impl Into<String>) -> Self {
        self.path_var = var.into();
        self
    }

    /// Sets the grading-program file extension.
    pub fn with_task_extension(mut self, ext: impl Into<String>) -> Self {
        self.task_extension = ext.into();
        self
    }

    /// Sets the per-task timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::new()
    }
}
