//! Deadline triage for tasks.
//!
//! Completion always suppresses urgency, however late the task was.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::model::Task;

/// Tasks due within this many hours (and not yet overdue) are flagged as soon.
pub const SOON_WINDOW_HOURS: i64 = 48;

pub fn soon_window() -> Duration {
    Duration::hours(SOON_WINDOW_HOURS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Normal,
    Soon,
    Overdue,
}

impl DeadlineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeadlineStatus::Normal => "normal",
            DeadlineStatus::Soon => "soon",
            DeadlineStatus::Overdue => "overdue",
        }
    }

    pub fn is_urgent(self) -> bool {
        self != DeadlineStatus::Normal
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(task: &Task, now: DateTime<Utc>) -> DeadlineStatus {
    if task.is_completed() {
        return DeadlineStatus::Normal;
    }
    let Some(due) = task.due_date else {
        return DeadlineStatus::Normal;
    };
    let time_left = due - now;
    if time_left < Duration::zero() {
        DeadlineStatus::Overdue
    } else if time_left < soon_window() {
        DeadlineStatus::Soon
    } else {
        DeadlineStatus::Normal
    }
}

pub fn classify_with(task: &Task, clock: &impl Clock) -> DeadlineStatus {
    classify(task, clock.now())
}
