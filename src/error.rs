//! Error types for labmark operations.
//!
//! Defines error types for the two failure-prone subsystems:
//! - Submission handling (request paths, directories, task discovery)
//! - Leaderboard table parsing and serialization
//!
//! Per-task execution failures are *not* errors: they are recorded as
//! `FailureReason` values on the task outcome so that one failing task never
//! aborts the tasks, labs, or requests that follow it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while handling one submission request.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid request path '{0}': expected <username>/lab<N>")]
    InvalidRequestPath(String),

    #[error("submission directory not found: {0}")]
    MissingSubmission(PathBuf),

    #[error("failed to discover tasks for lab{lab}: {source}")]
    TaskDiscovery {
        lab: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while parsing or updating the leaderboard table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("leaderboard table not found in document")]
    TableNotFound,

    #[error("table header is missing the '{0}' column")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
