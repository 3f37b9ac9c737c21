//! Child-process execution of a single grading task.

use std::ffi::OsString;
use std::path::Path;

use tokio::process::Command;
use tracing::{debug, error, warn};

use super::config::ExecutorConfig;
use super::result::{FailureReason, TaskOutcome};

/// Runs one grading program as an isolated child process.
///
/// The process gets the submission directory as its working directory and an
/// environment identical to the parent's, except that the submission
/// directory is prepended to the configured search-path variable. Output is
/// captured whole, never streamed.
pub struct TaskExecutor {
    config: ExecutorConfig,
}

impl TaskExecutor {
    /// Creates an executor with the given configuration.
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Executes the grading program at `task_path` against a submission.
    ///
    /// Never fails: every fault is folded into the returned outcome so that
    /// one task cannot abort the tasks that follow it.
    pub async fn execute(
        &self,
        task_id: &str,
        task_path: &Path,
        working_dir: &Path,
        extra_path_entry: &Path,
    ) -> TaskOutcome {
        debug!(
            "running {} via {} in {}",
            task_path.display(),
            self.config.interpreter,
            working_dir.display()
        );

        let mut command = Command::new(&self.config.interpreter);
        command
            .arg(task_path)
            .current_dir(working_dir)
            .env(&self.config.path_var, self.search_path_value(extra_path_entry))
            .kill_on_drop(true);

        match tokio::time::timeout(self.config.timeout, command.output()).await {
            Ok(Ok(output)) => {
                // A killed process yields no code; fall back to the sentinel.
                let exit_code = output.status.code().unwrap_or(-1);
                if exit_code != 0 {
                    debug!("{} exited with code {}", task_id, exit_code);
                }
                TaskOutcome::completed(
                    task_id,
                    exit_code,
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr),
                )
            }
            Ok(Err(e)) => {
                error!("failed to run {}: {}", task_path.display(), e);
                let reason = if e.kind() == std::io::ErrorKind::NotFound {
                    FailureReason::ExecutionError
                } else {
                    FailureReason::UnexpectedError
                };
                TaskOutcome::faulted(task_id, reason, e.to_string())
            }
            Err(_) => {
                // Dropping the future kills the child (kill_on_drop).
                warn!(
                    "{} timed out after {:?}",
                    task_id, self.config.timeout
                );
                TaskOutcome::faulted(
                    task_id,
                    FailureReason::Timeout,
                    format!("timed out after {:?}", self.config.timeout),
                )
            }
        }
    }

    /// Builds the search-path value: the submission directory first, then
    /// whatever the parent process already had.
    fn search_path_value(&self, extra_path_entry: &Path) -> OsString {
        match std::env::var_os(&self.config.path_var) {
            Some(existing) => {
                let entries = std::iter::once(extra_path_entry.to_path_buf())
                    .chain(std::env::split_paths(&existing));
                std::env::join_paths(entries)
                    .unwrap_or_else(|_| extra_path_entry.as_os_str().to_os_string())
            }
            None => extra_path_entry.as_os_str().to_os_string(),
        }
    }
}
