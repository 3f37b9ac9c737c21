//! Parsing and serialization of the leaderboard document.
//!
//! The document is free-form prose followed by exactly one pipe-delimited
//! markdown table. Everything before the table's header line is preserved
//! verbatim; everything from it onward is owned by the table engine and
//! rewritten wholesale on update.

use crate::error::TableError;
use crate::runner::TaskOutcomes;

use super::table::{AchievementTable, UserAchievement, RANK_HEADER, TOTAL_HEADER, USERNAME_HEADER};

/// The minimal two-line skeleton used when no document exists yet.
pub fn default_document() -> Vec<String> {
    vec![
        format!("| {RANK_HEADER} | {USERNAME_HEADER} | lab1 | {TOTAL_HEADER} |"),
        "| --- | --- | --- | --- |".to_string(),
    ]
}

/// Locates the table's header line: the first line containing both the rank
/// and username column labels.
pub fn find_table_start(lines: &[String]) -> Result<usize, TableError> {
    lines
        .iter()
        .position(|line| line.contains(RANK_HEADER) && line.contains(USERNAME_HEADER))
        .ok_or(TableError::TableNotFound)
}

/// Splits a table row into trimmed cells, dropping the outer pipes.
fn row_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Parses the document into an `AchievementTable`.
///
/// Reads the header line, skips exactly one separator line, then reads data
/// rows until a blank line or the end of the document. Malformed rows with
/// fewer cells than headers are skipped. Only `lab`-prefixed columns feed
/// the achievements map; derived columns (totals) are recomputed, not read.
pub fn parse_table(lines: &[String]) -> Result<AchievementTable, TableError> {
    let start = find_table_start(lines)?;

    let headers: Vec<String> = row_cells(&lines[start])
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .collect();
    let rank_index = headers
        .iter()
        .position(|h| h == RANK_HEADER)
        .ok_or_else(|| TableError::MissingColumn(RANK_HEADER.to_string()))?;
    let username_index = headers
        .iter()
        .position(|h| h == USERNAME_HEADER)
        .ok_or_else(|| TableError::MissingColumn(USERNAME_HEADER.to_string()))?;

    let mut table = AchievementTable::new();
    table.headers = headers;

    // start + 1 is the separator row.
    for line in lines.iter().skip(start + 2) {
        if line.trim().is_empty() {
            break;
        }
        let cells = row_cells(line);
        if cells.len() < table.headers.len() {
            continue;
        }

        let mut user = UserAchievement::new(cells[username_index].clone());
        user.rank = cells[rank_index].parse().unwrap_or(1);
        for (index, header) in table.headers.iter().enumerate() {
            if header.starts_with("lab") {
                user.set_achievement(header.clone(), cells[index].clone());
            }
        }
        table.users.push(user);
    }

    Ok(table)
}

/// Renders the table as a markdown text block, or `None` when it has no
/// rows, signaling the caller to leave the document untouched.
pub fn format_table(table: &AchievementTable) -> Option<String> {
    if table.users.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(table.users.len() + 2);
    lines.push(format!("| {} |", table.headers.join(" | ")));
    lines.push(format!(
        "|{}|",
        vec![" --- "; table.headers.len()].join("|")
    ));
    for user in &table.users {
        lines.push(format!("| {} |", user.row_cells(&table.headers).join(" | ")));
    }
    Some(lines.join("\n"))
}

/// Replaces the document's table section with a fresh rendering, keeping
/// any preamble before the table start verbatim.
pub fn update_content(
    lines: &[String],
    table: &AchievementTable,
) -> Result<Vec<String>, TableError> {
    let start = find_table_start(lines)?;
    match format_table(table) {
        Some(rendered) => {
            let mut updated: Vec<String> = lines[..start].to_vec();
            updated.extend(rendered.lines().map(String::from));
            Ok(updated)
        }
        None => Ok(lines.to_vec()),
    }
}

/// Makes sure a column exists for every available lab, re-serializing the
/// document. Run once at the start of an evaluation run to normalize the
/// document's shape.
pub fn ensure_lab_columns(lines: &[String], labs: &[u32]) -> Result<Vec<String>, TableError> {
    let mut table = parse_table(lines)?;
    for &lab_num in labs {
        table.ensure_lab_column(lab_num);
    }
    update_content(lines, &table)
}

/// Folds one lab's task outcomes into the document: computes the pass
/// percentage, updates the user's cell, recomputes rankings, re-serializes.
pub fn update_user_achievement(
    lines: &[String],
    username: &str,
    lab_num: u32,
    tasks: &TaskOutcomes,
) -> Result<Vec<String>, TableError> {
    let mut table = parse_table(lines)?;
    let percentage = tasks.pass_percentage();

    table.ensure_lab_column(lab_num);
    table
        .get_or_create_user(username)
        .update_lab(lab_num, percentage);
    table.update_rankings();

    update_content(lines, &table)
}
