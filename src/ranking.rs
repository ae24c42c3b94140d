//! Contribution ranking.
//!
//! Every member gets exactly one row, including members with nothing
//! completed. Scores are recomputed from task status on each call, so
//! completing a task twice can never count it twice.

use std::collections::HashMap;

use crate::model::{Member, RankingRow, Task};

/// Points per difficulty level of a completed task.
pub const DEFAULT_DIFFICULTY_WEIGHT: u32 = 1;

/// Largest weight a config may set.
pub const MAX_DIFFICULTY_WEIGHT: u32 = 1_000;

/// Builds the leaderboard.
///
/// Ordering: total score descending, then completed task count descending,
/// then member id ascending. Scores saturate at `u32::MAX`.
pub fn rank(tasks: &[Task], members: &[Member], weight: u32) -> Vec<RankingRow> {
    let mut totals: HashMap<&str, (u32, usize)> = HashMap::new();
    for task in tasks.iter().filter(|task| task.is_completed()) {
        let entry = totals.entry(task.assignee_id.as_str()).or_default();
        let points = weight.saturating_mul(u32::from(task.difficulty.get()));
        entry.0 = entry.0.saturating_add(points);
        entry.1 += 1;
    }

    let mut rows: Vec<RankingRow> = members
        .iter()
        .map(|member| {
            let (total_score, completed_tasks_count) =
                totals.get(member.id.as_str()).copied().unwrap_or_default();
            RankingRow {
                member_id: member.id.clone(),
                member_name: member.name.clone(),
                total_score,
                completed_tasks_count,
                avatar: member.avatar.clone(),
            }
        })
        .collect();

    rows.sort_by(|left, right| {
        right
            .total_score
            .cmp(&left.total_score)
            .then_with(|| right.completed_tasks_count.cmp(&left.completed_tasks_count))
            .then_with(|| left.member_id.cmp(&right.member_id))
    });
    rows
}
