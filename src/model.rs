//! Domain records for the task board.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Organization member on the fixed roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    /// Free-text organizational title (e.g. treasurer).
    #[serde(default)]
    pub role: String,
    /// Opaque image reference.
    #[serde(default)]
    pub avatar: String,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            avatar: avatar.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Planned,
    Doing,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Planned => "PLANNED",
            TaskStatus::Doing => "DOING",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task difficulty on the closed 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(pub(crate) u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Error::InvalidInput(format!(
                "difficulty must be between {} and {}, got {level}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub assignee_id: String,
    /// Assignee's name at the time of assignment; not a live reference.
    pub assignee_name: String,
    pub difficulty: Difficulty,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Checks the record-level invariants that the type system does not cover.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "task '{}' has an empty title",
                self.id
            )));
        }
        match (self.status, self.completed_at) {
            (TaskStatus::Completed, None) => {
                return Err(Error::InvalidInput(format!(
                    "task '{}' is COMPLETED but has no completed_at",
                    self.id
                )));
            }
            (TaskStatus::Planned | TaskStatus::Doing, Some(_)) => {
                return Err(Error::InvalidInput(format!(
                    "task '{}' has completed_at but status {}",
                    self.id, self.status
                )));
            }
            _ => {}
        }
        if let Some(completed_at) = self.completed_at {
            if completed_at < self.created_at {
                return Err(Error::InvalidInput(format!(
                    "task '{}' completed before it was created",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Leaderboard row derived from completed tasks; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingRow {
    pub member_id: String,
    pub member_name: String,
    pub total_score: u32,
    pub completed_tasks_count: usize,
    pub avatar: String,
}
