//! Top-level coordination of an evaluation run.
//!
//! State machine per run:
//! load document → normalize lab columns → evaluate each request →
//! persist document once → report. Request-level and task-level failures
//! are contained in their outcome; only a missing table in an existing
//! document or an unreadable document aborts the run.

use std::fs;

use regex::Regex;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::{SubmissionError, TableError};
use crate::leaderboard;
use crate::runner::{available_labs, LabOutcome, LabRunner};

use super::config::EvalConfig;

/// Faults that abort the whole run before or outside per-request handling.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The leaderboard document could not be read or lacks a table.
    #[error("leaderboard error: {0}")]
    Table(#[from] TableError),

    /// The leaderboard document exists but could not be read.
    #[error("failed to read leaderboard document: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one orchestrator run: outcomes in request order plus the
/// persistence status of the leaderboard document.
#[derive(Debug)]
pub struct EvalReport {
    /// One outcome per requested path, in request order.
    pub outcomes: Vec<LabOutcome>,
    /// Error writing the leaderboard back, if any.
    pub persist_error: Option<String>,
}

impl EvalReport {
    /// True iff every requested lab passed.
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// True iff every lab passed and the leaderboard persisted.
    pub fn success(&self) -> bool {
        self.all_passed() && self.persist_error.is_none()
    }
}

/// Parses a request path of the form `<username>/lab<N>`.
fn parse_request(request: &str) -> Result<(String, u32), SubmissionError> {
    let pattern =
        Regex::new(r"^([A-Za-z0-9_-]+)/lab(\d+)$").expect("request pattern is valid");
    let invalid = || SubmissionError::InvalidRequestPath(request.to_string());
    let caps = pattern.captures(request).ok_or_else(|| invalid())?;
    let lab_num = caps[2].parse().map_err(|_| invalid())?;
    Ok((caps[1].to_string(), lab_num))
}

/// Drives a full evaluation run against one leaderboard document.
pub struct Orchestrator {
    config: EvalConfig,
}

impl Orchestrator {
    /// Creates an orchestrator for the given configuration.
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Evaluates every requested `<username>/lab<N>` path.
    ///
    /// The leaderboard document is loaded once, mutated in memory across all
    /// requests, and written back exactly once at the end regardless of how
    /// many evaluations failed.
    pub async fn run(&self, requests: &[String]) -> Result<EvalReport, OrchestratorError> {
        let mut document = self.load_document()?;

        let labs = available_labs(&self.config.tasks_dir);
        if labs.is_empty() {
            warn!(
                "no lab directories found under {}",
                self.config.tasks_dir.display()
            );
        }
        document = leaderboard::ensure_lab_columns(&document, &labs)?;

        let runner = LabRunner::new(&self.config.tasks_dir, self.config.executor.clone());

        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            let (username, lab_num) = match parse_request(request) {
                Ok(parsed) => parsed,
                Err(e) => {
                    error!("{e}");
                    outcomes.push(LabOutcome::failed(0, request.clone(), e.to_string()));
                    continue;
                }
            };

            info!("evaluating user {username}, lab {lab_num}");
            let submission = self.config.submission_path(&username, lab_num);
            let mut outcome = runner.run(&username, lab_num, &submission).await;

            // A stub outcome never ran any task; folding it into the table
            // would wipe the user's existing cell for this lab.
            if outcome.error.is_none() {
                match leaderboard::update_user_achievement(
                    &document,
                    &username,
                    lab_num,
                    &outcome.tasks,
                ) {
                    Ok(updated) => document = updated,
                    Err(e) => {
                        error!("leaderboard update failed for {request}: {e}");
                        outcome.record_table_update_error(e.to_string());
                    }
                }
            }

            outcomes.push(outcome);
        }

        let persist_error = self.persist_document(&document).err().map(|e| {
            error!(
                "failed to write {}: {e}",
                self.config.leaderboard_path.display()
            );
            e.to_string()
        });
        if persist_error.is_none() {
            info!("updated {}", self.config.leaderboard_path.display());
        }

        Ok(EvalReport {
            outcomes,
            persist_error,
        })
    }

    /// Reads the leaderboard document, synthesizing the default skeleton
    /// when it does not exist yet.
    fn load_document(&self) -> Result<Vec<String>, OrchestratorError> {
        match fs::read_to_string(&self.config.leaderboard_path) {
            Ok(content) => Ok(content.lines().map(String::from).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "{} not found, starting from an empty leaderboard",
                    self.config.leaderboard_path.display()
                );
                Ok(leaderboard::default_document())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the document back, exactly once per run.
    fn persist_document(&self, document: &[String]) -> Result<(), std::io::Error> {
        let mut content = document.join("\n");
        content.push('\n');
        fs::write(&self.config.leaderboard_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_accepts_valid_paths() {
        assert_eq!(parse_request("alice/lab1").unwrap(), ("alice".to_string(), 1));
        assert_eq!(
            parse_request("user_name-2/lab10").unwrap(),
            ("user_name-2".to_string(), 10)
        );
    }

    #[test]
    fn test_parse_request_rejects_invalid_paths() {
        for bad in [
            "alice",
            "alice/lab",
            "alice/labX",
            "alice/lab1/extra",
            "al ice/lab1",
            "../etc/lab1",
            "alice/Lab1",
        ] {
            assert!(parse_request(bad).is_err(), "accepted: {bad}");
        }
    }

    #[test]
    fn test_report_success_requires_persistence() {
        let report = EvalReport {
            outcomes: Vec::new(),
            persist_error: None,
        };
        assert!(report.success());

        let report = EvalReport {
            outcomes: Vec::new(),
            persist_error: Some("disk full".to_string()),
        };
        assert!(report.all_passed());
        assert!(!report.success());
    }
}
