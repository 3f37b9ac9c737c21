//! Lab-level evaluation: drives all grading tasks for one submission.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::SubmissionError;

use super::config::ExecutorConfig;
use super::discovery;
use super::executor::TaskExecutor;
use super::result::{LabOutcome, TaskOutcomes};

/// Evaluates one (user, lab) submission by running its grading tasks
/// strictly sequentially.
///
/// Later tasks may depend on side effects earlier tasks left in the
/// submission directory, so tasks never run concurrently and every
/// discovered task runs regardless of earlier failures.
pub struct LabRunner {
    executor: TaskExecutor,
    tasks_dir: PathBuf,
    task_extension: String,
}

impl LabRunner {
    /// Creates a runner that discovers grading programs under `tasks_dir`.
    pub fn new(tasks_dir: impl Into<PathBuf>, config: ExecutorConfig) -> Self {
        let task_extension = config.task_extension.clone();
        Self {
            executor: TaskExecutor::new(config),
            tasks_dir: tasks_dir.into(),
            task_extension,
        }
    }

    /// Runs every grading task for `lab_num` against `submission_path`.
    ///
    /// Submission-level faults (missing directory, discovery failure) come
    /// back as a failed `LabOutcome` with the `error` field populated; no
    /// task runs in that case.
    pub async fn run(&self, username: &str, lab_num: u32, submission_path: &Path) -> LabOutcome {
        if !submission_path.is_dir() {
            let error = SubmissionError::MissingSubmission(submission_path.to_path_buf());
            return LabOutcome::failed(lab_num, username, error.to_string());
        }

        let tasks = match discovery::discover_tasks(&self.tasks_dir, lab_num, &self.task_extension)
        {
            Ok(tasks) => tasks,
            Err(e) => return LabOutcome::failed(lab_num, username, e.to_string()),
        };

        let mut outcomes = TaskOutcomes::new();
        for task in &tasks {
            info!(
                "evaluating {}/lab{}: running {}",
                username, lab_num, task.id
            );
            let outcome = self
                .executor
                .execute(&task.id, &task.path, submission_path, submission_path)
                .await;
            outcomes.push(outcome);
        }

        LabOutcome::from_tasks(lab_num, username, outcomes)
    }
}
