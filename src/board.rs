//! Derived display lists for the task board and the ranking podium.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::deadline::{classify, DeadlineStatus};
use crate::model::{RankingRow, Task};

#[derive(Debug, Clone, Serialize)]
pub struct BoardEntry {
    pub task: Task,
    pub deadline: DeadlineStatus,
    /// The acting member may report this task as done.
    pub completable: bool,
}

/// Task board as seen by one member: their own tasks and everyone else's
/// activity, both most recent first.
#[derive(Debug, Clone, Serialize)]
pub struct TaskBoard {
    pub member_id: String,
    pub mine: Vec<BoardEntry>,
    pub others: Vec<BoardEntry>,
}

impl TaskBoard {
    pub fn build(tasks: &[Task], acting_member: &str, now: DateTime<Utc>) -> Self {
        let mut mine = Vec::new();
        let mut others = Vec::new();
        for task in tasks {
            let own = task.assignee_id == acting_member;
            let entry = BoardEntry {
                task: task.clone(),
                deadline: classify(task, now),
                completable: own && !task.is_completed(),
            };
            if own {
                mine.push(entry);
            } else {
                others.push(entry);
            }
        }
        Self {
            member_id: acting_member.to_string(),
            mine,
            others,
        }
    }

    pub fn overdue_count(&self) -> usize {
        self.entries()
            .filter(|entry| entry.deadline == DeadlineStatus::Overdue)
            .count()
    }

    pub fn due_soon_count(&self) -> usize {
        self.entries()
            .filter(|entry| entry.deadline == DeadlineStatus::Soon)
            .count()
    }

    /// The acting member's task to finish next: the first urgent one,
    /// otherwise the most recent open one.
    pub fn next_to_complete(&self) -> Option<&BoardEntry> {
        let mut open = self.mine.iter().filter(|entry| entry.completable);
        let first = open.clone().next();
        open.find(|entry| entry.deadline.is_urgent()).or(first)
    }

    fn entries(&self) -> impl Iterator<Item = &BoardEntry> {
        self.mine.iter().chain(self.others.iter())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PodiumPlace {
    /// 1-based position on the leaderboard.
    pub position: usize,
    pub row: RankingRow,
}

/// Top three of the leaderboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Podium {
    pub places: Vec<PodiumPlace>,
}

impl Podium {
    pub const SIZE: usize = 3;

    pub fn from_rows(rows: &[RankingRow]) -> Self {
        let places = rows
            .iter()
            .take(Self::SIZE)
            .enumerate()
            .map(|(index, row)| PodiumPlace {
                position: index + 1,
                row: row.clone(),
            })
            .collect();
        Self { places }
    }

    pub fn first(&self) -> Option<&PodiumPlace> {
        self.places.first()
    }
}
