//! In-memory leaderboard model: headers, per-user rows, ranking.

use std::collections::HashMap;

use chrono::Local;

/// Rank column label as it appears in the persisted document.
pub const RANK_HEADER: &str = "用户排名";
/// Username column label as it appears in the persisted document.
pub const USERNAME_HEADER: &str = "用户名";
/// Total-completed column label; always the last header.
pub const TOTAL_HEADER: &str = "完成任务总数";

/// Header name for a lab column.
pub fn lab_header(lab_num: u32) -> String {
    format!("lab{lab_num}")
}

/// One leaderboard row: a user's rank and per-lab achievements.
///
/// An achievement cell is either empty (no attempt, or no credit this run),
/// `"<date> : √"` for a full pass, or `"<date> : NN.N%"` for a partial pass.
#[derive(Debug, Clone)]
pub struct UserAchievement {
    /// Unique key for the row; matched case-sensitively.
    pub username: String,
    /// Dense 1-based rank; 1 is best. Recomputed on every mutation.
    pub rank: u32,
    achievements: HashMap<String, String>,
}

impl UserAchievement {
    /// Creates a zero-state row.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            rank: 1,
            achievements: HashMap::new(),
        }
    }

    /// Records the result for one lab using today's date.
    ///
    /// A zero percentage clears the cell entirely, making "no credit this
    /// run" indistinguishable from "never attempted". Intentional: visible
    /// failure history is not kept.
    pub fn update_lab(&mut self, lab_num: u32, percentage: f64) {
        let cell = if percentage > 0.0 {
            let date = Local::now().format("%Y-%m-%d");
            if (percentage - 100.0).abs() < f64::EPSILON {
                format!("{date} : √")
            } else {
                format!("{date} : {percentage:.1}%")
            }
        } else {
            String::new()
        };
        self.achievements.insert(lab_header(lab_num), cell);
    }

    /// Returns the stored cell for a lab header, empty if absent.
    pub fn achievement(&self, header: &str) -> &str {
        self.achievements.get(header).map_or("", String::as_str)
    }

    /// Stores a raw cell value for a lab header (used when parsing).
    pub fn set_achievement(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.achievements.insert(header.into(), value.into());
    }

    /// Number of labs with a non-empty achievement cell.
    pub fn completed_labs(&self) -> usize {
        self.achievements
            .values()
            .filter(|v| !v.trim().is_empty())
            .count()
    }

    /// Renders this row's cells in header order.
    pub fn row_cells(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|header| {
                if header == RANK_HEADER {
                    self.rank.to_string()
                } else if header == USERNAME_HEADER {
                    self.username.clone()
                } else if header == TOTAL_HEADER {
                    self.completed_labs().to_string()
                } else {
                    self.achievement(header).to_string()
                }
            })
            .collect()
    }
}

/// The whole leaderboard: ordered headers plus user rows.
#[derive(Debug, Clone)]
pub struct AchievementTable {
    /// Column headers. Lab columns sit between the fixed rank/username pair
    /// and the trailing total column, ordered by first insertion.
    pub headers: Vec<String>,
    /// User rows, kept in rank order after `update_rankings`.
    pub users: Vec<UserAchievement>,
}

impl AchievementTable {
    /// Creates an empty table with the fixed headers only.
    pub fn new() -> Self {
        Self {
            headers: vec![
                RANK_HEADER.to_string(),
                USERNAME_HEADER.to_string(),
                TOTAL_HEADER.to_string(),
            ],
            users: Vec::new(),
        }
    }

    /// Inserts the lab column immediately before the total column if it is
    /// not already present. Idempotent.
    pub fn ensure_lab_column(&mut self, lab_num: u32) {
        let header = lab_header(lab_num);
        if self.headers.contains(&header) {
            return;
        }
        let position = self
            .headers
            .iter()
            .position(|h| h == TOTAL_HEADER)
            .unwrap_or(self.headers.len());
        self.headers.insert(position, header);
    }

    /// Returns the row for `username`, appending a zero-state row if absent.
    /// Matching is exact and case-sensitive; the first match wins.
    pub fn get_or_create_user(&mut self, username: &str) -> &mut UserAchievement {
        let index = match self.users.iter().position(|u| u.username == username) {
            Some(index) => index,
            None => {
                self.users.push(UserAchievement::new(username));
                self.users.len() - 1
            }
        };
        &mut self.users[index]
    }

    /// Re-sorts rows by completed-lab count (descending, stable) and
    /// reassigns dense 1-based ranks.
    pub fn update_rankings(&mut self) {
        self.users
            .sort_by_key(|u| std::cmp::Reverse(u.completed_labs()));
        for (index, user) in self.users.iter_mut().enumerate() {
            user.rank = (index + 1) as u32;
        }
    }
}

impl Default for AchievementTable {
    fn default() -> Self {
        Self::new()
    }
}
