//! Discovery of grading programs and available labs.
//!
//! Grading programs live under `<tasks_dir>/lab<N>/task<K>.<ext>`. Ordering
//! is by the integer embedded in the name, not lexical, so `task10` runs
//! after `task9`.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::SubmissionError;

/// A grading program discovered for a lab.
#[derive(Debug, Clone)]
pub struct TaskProgram {
    /// Task identifier, e.g. "task3".
    pub id: String,
    /// Absolute or base-relative path to the program.
    pub path: PathBuf,
}

/// Returns the grading programs for `lab_num`, ordered by task number.
pub fn discover_tasks(
    tasks_dir: &Path,
    lab_num: u32,
    extension: &str,
) -> Result<Vec<TaskProgram>, SubmissionError> {
    let lab_dir = tasks_dir.join(format!("lab{lab_num}"));
    let pattern = Regex::new(&format!(r"^task(\d+)\.{}$", regex::escape(extension)))
        .map_err(|e| SubmissionError::TaskDiscovery {
            lab: lab_num,
            source: std::io::Error::other(e),
        })?;

    let entries = std::fs::read_dir(&lab_dir).map_err(|source| SubmissionError::TaskDiscovery {
        lab: lab_num,
        source,
    })?;

    let mut tasks: Vec<(u32, TaskProgram)> = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(caps) = pattern.captures(name) {
            let Ok(number) = caps[1].parse::<u32>() else {
                continue;
            };
            tasks.push((
                number,
                TaskProgram {
                    id: format!("task{number}"),
                    path,
                },
            ));
        }
    }

    tasks.sort_by_key(|(number, _)| *number);
    Ok(tasks.into_iter().map(|(_, task)| task).collect())
}

/// Returns the lab numbers that have a `lab<N>` directory, sorted ascending.
///
/// A missing or unreadable tasks directory yields an empty set rather than
/// an error; the caller decides whether that matters.
pub fn available_labs(tasks_dir: &Path) -> Vec<u32> {
    let Ok(pattern) = Regex::new(r"^lab(\d+)$") else {
        return Vec::new();
    };
    let Ok(entries) = std::fs::read_dir(tasks_dir) else {
        return Vec::new();
    };

    let mut labs: Vec<u32> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name();
            let name = name.to_str()?;
            pattern.captures(name)?[1].parse::<u32>().ok()
        })
        .collect();
    labs.sort_unstable();
    labs
}
