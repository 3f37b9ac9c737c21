//! Configuration for an evaluation run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::runner::ExecutorConfig;

/// Filesystem layout and execution settings for one orchestrator run.
///
/// Everything is an explicit value derived from one base directory; nothing
/// reads the ambient working directory or mutates global process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Directory the standard layout is derived from.
    pub base_dir: PathBuf,
    /// Directory holding `lab<N>/task<K>` grading programs.
    pub tasks_dir: PathBuf,
    /// Directory holding `<username>/lab<N>` submissions.
    pub submissions_dir: PathBuf,
    /// The leaderboard document.
    pub leaderboard_path: PathBuf,
    /// Child-process execution settings.
    pub executor: ExecutorConfig,
}

impl EvalConfig {
    /// Creates a configuration with the standard layout under `base_dir`:
    /// `code/` for grading programs, `submit/` for submissions, `README.md`
    /// for the leaderboard.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            tasks_dir: base_dir.join("code"),
            submissions_dir: base_dir.join("submit"),
            leaderboard_path: base_dir.join("README.md"),
            base_dir,
            executor: ExecutorConfig::new(),
        }
    }

    /// Overrides the grading-programs directory.
    pub fn with_tasks_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tasks_dir = dir.into();
        self
    }

    /// Overrides the submissions directory.
    pub fn with_submissions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.submissions_dir = dir.into();
        self
    }

    /// Overrides the leaderboard document path.
    pub fn with_leaderboard(mut self, path: impl Into<PathBuf>) -> Self {
        self.leaderboard_path = path.into();
        self
    }

    /// Replaces the executor settings.
    pub fn with_executor(mut self, executor: ExecutorConfig) -> Self {
        self.executor = executor;
        self
    }

    /// Resolves the submission directory for one (user, lab) pair.
    pub fn submission_path(&self, username: &str, lab_num: u32) -> PathBuf {
        self.submissions_dir
            .join(username)
            .join(format!("lab{lab_num}"))
    }
}
