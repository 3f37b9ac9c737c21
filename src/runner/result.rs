//! Outcome types for task and lab evaluation.
//!
//! Task failures are data, not errors: a `TaskOutcome` always exists for
//! every executed task, and `FailureReason` distinguishes system faults
//! (timeout, launch failure) from a grading program that simply exited
//! non-zero.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel exit code for tasks that never produced a natural one.
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Why a task failed at the system level, if it did.
///
/// Absent for tasks that ran to completion, including those whose grading
/// program exited non-zero: a natural non-zero exit is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// The task exceeded its wall-clock limit and was terminated.
    Timeout,
    /// The grading program could not be launched.
    ExecutionError,
    /// Any other fault during execution.
    UnexpectedError,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Timeout => write!(f, "timeout"),
            FailureReason::ExecutionError => write!(f, "execution-error"),
            FailureReason::UnexpectedError => write!(f, "unexpected-error"),
        }
    }
}

/// Result of executing one grading task. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Task identifier, e.g. "task1".
    pub task_id: String,
    /// Exit code of the grading program; -1 when none was produced.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// System-level failure, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure_reason: Option<FailureReason>,
}

impl TaskOutcome {
    /// Creates an outcome for a task that ran to completion, whatever its
    /// exit code.
    pub fn completed(
        task_id: impl Into<String>,
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            failure_reason: None,
        }
    }

    /// Creates an outcome for a task that hit a system fault. The diagnostic
    /// lands in `stderr` so operators can see it in the report.
    pub fn faulted(
        task_id: impl Into<String>,
        reason: FailureReason,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            exit_code: UNKNOWN_EXIT_CODE,
            stdout: String::new(),
            stderr: diagnostic.into(),
            failure_reason: Some(reason),
        }
    }

    /// Returns true if the task passed: natural exit 0 and no system fault.
    pub fn is_pass(&self) -> bool {
        self.exit_code == 0 && self.failure_reason.is_none()
    }
}

/// Task outcomes in execution order.
///
/// Serializes as a JSON object keyed by task id, preserving insertion order,
/// so the report round-trips the shape callers expect.
#[derive(Debug, Clone, Default)]
pub struct TaskOutcomes(Vec<TaskOutcome>);

impl TaskOutcomes {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an outcome, keeping execution order.
    pub fn push(&mut self, outcome: TaskOutcome) {
        self.0.push(outcome);
    }

    /// Number of recorded outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no tasks were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates outcomes in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.0.iter()
    }

    /// Number of outcomes that passed.
    pub fn passed_count(&self) -> usize {
        self.0.iter().filter(|o| o.is_pass()).count()
    }

    /// Pass percentage over all recorded outcomes, or 0.0 when empty.
    pub fn pass_percentage(&self) -> f64 {
        if self.0.is_empty() {
            0.0
        } else {
            (self.passed_count() as f64 / self.0.len() as f64) * 100.0
        }
    }

    /// Returns true iff every outcome passed. Vacuously true when empty.
    pub fn all_passed(&self) -> bool {
        self.0.iter().all(TaskOutcome::is_pass)
    }
}

impl FromIterator<TaskOutcome> for TaskOutcomes {
    fn from_iter<I: IntoIterator<Item = TaskOutcome>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for TaskOutcomes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for outcome in &self.0 {
            map.serialize_entry(&outcome.task_id, outcome)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TaskOutcomes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OutcomesVisitor;

        impl<'de> Visitor<'de> for OutcomesVisitor {
            type Value = TaskOutcomes;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of task id to task outcome")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut outcomes = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((_, outcome)) = access.next_entry::<String, TaskOutcome>()? {
                    outcomes.push(outcome);
                }
                Ok(TaskOutcomes(outcomes))
            }
        }

        deserializer.deserialize_map(OutcomesVisitor)
    }
}

/// Aggregated result of evaluating one (user, lab) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabOutcome {
    /// Lab number being evaluated.
    pub lab_num: u32,
    /// Username the submission belongs to.
    pub username: String,
    /// Per-task outcomes in execution order.
    pub tasks: TaskOutcomes,
    /// True iff every task passed.
    pub passed: bool,
    /// Submission-level error: bad path, missing directory, discovery fault.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    /// Failure while folding these results into the leaderboard.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub table_update_error: Option<String>,
}

impl LabOutcome {
    /// Creates an outcome from executed tasks; `passed` is derived.
    pub fn from_tasks(lab_num: u32, username: impl Into<String>, tasks: TaskOutcomes) -> Self {
        let passed = tasks.all_passed();
        Self {
            lab_num,
            username: username.into(),
            tasks,
            passed,
            error: None,
            table_update_error: None,
        }
    }

    /// Creates a failed stub for a submission that never ran any task.
    pub fn failed(lab_num: u32, username: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            lab_num,
            username: username.into(),
            tasks: TaskOutcomes::new(),
            passed: false,
            error: Some(error.into()),
            table_update_error: None,
        }
    }

    /// Attaches a table-update failure and marks the lab as failed.
    pub fn record_table_update_error(&mut self, error: impl Into<String>) {
        self.table_update_error = Some(error.into());
        self.passed = false;
    }
}
