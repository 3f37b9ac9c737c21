//! Leaderboard table engine.
//!
//! Reconciles evaluation results with the persisted markdown leaderboard:
//! parses the existing table, inserts lab columns and user rows as needed,
//! recomputes rankings, and re-serializes the document.

pub mod parser;
pub mod table;

pub use parser::{
    default_document, ensure_lab_columns, find_table_start, format_table, parse_table,
    update_content, update_user_achievement,
};
pub use table::{lab_header, AchievementTable, UserAchievement};
