//! taskhub board and members commands.

use chrono::{DateTime, Utc};

use crate::board::{BoardEntry, TaskBoard};
use crate::cli::Context;
use crate::clock::Clock;
use crate::deadline::DeadlineStatus;
use crate::error::Result;
use crate::model::{Member, Task};
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;

pub fn run_board(ctx: &Context) -> Result<()> {
    let (board, human) = board_view(&ctx.store);
    emit_success(ctx.output, "board", &board, Some(&human))
}

pub fn run_members(ctx: &Context) -> Result<()> {
    let (members, human) = members_view(&ctx.store);
    emit_success(ctx.output, "members", &members, Some(&human))
}

pub(crate) fn board_view<C: Clock>(store: &TaskStore<C>) -> (TaskBoard, HumanOutput) {
    let board = store.board();
    let acting = store.acting_member();

    let mut human = HumanOutput::new("Task board");
    human.push_summary("Member", format!("{} ({})", acting.name, acting.id));
    human.push_summary("My tasks", board.mine.len().to_string());
    human.push_summary("Members' activity", board.others.len().to_string());
    human.push_section(
        "My tasks",
        board.mine.iter().map(|entry| format_entry(entry, false)).collect(),
    );
    human.push_section(
        "Members' activity",
        board.others.iter().map(|entry| format_entry(entry, true)).collect(),
    );

    let overdue = board.overdue_count();
    if overdue > 0 {
        human.push_warning(format!("{overdue} task(s) overdue"));
    }
    let soon = board.due_soon_count();
    if soon > 0 {
        human.push_warning(format!("{soon} task(s) due within 48h"));
    }
    if let Some(entry) = board.next_to_complete() {
        human.push_next_step(format!("taskhub complete {}", entry.task.id));
    }

    (board, human)
}

pub(crate) fn members_view<C: Clock>(store: &TaskStore<C>) -> (Vec<Member>, HumanOutput) {
    let members = store.members().to_vec();
    let mut human = HumanOutput::new("Members");
    human.push_summary("Total", members.len().to_string());
    human.push_section(
        "Roster",
        members
            .iter()
            .map(|member| {
                if member.role.is_empty() {
                    format!("{} {}", member.id, member.name)
                } else {
                    format!("{} {} ({})", member.id, member.name, member.role)
                }
            })
            .collect(),
    );
    (members, human)
}

fn format_entry(entry: &BoardEntry, with_assignee: bool) -> String {
    let task = &entry.task;
    let mut line = format!("{} {}", task.id, task.title);
    if with_assignee {
        line.push_str(&format!(" - {}", task.assignee_name));
    }
    line.push_str(&format!(" [{}] difficulty {}", task.status, task.difficulty));
    if let Some(due) = task.due_date {
        line.push_str(&format!(", due {}", format_time(due)));
    }
    match entry.deadline {
        DeadlineStatus::Overdue => line.push_str(" (OVERDUE)"),
        DeadlineStatus::Soon => line.push_str(" (due soon)"),
        DeadlineStatus::Normal => {}
    }
    line
}

pub(crate) fn format_task(task: &Task) -> String {
    format!(
        "{} {} [{}] difficulty {}",
        task.id, task.title, task.status, task.difficulty
    )
}

pub(crate) fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::output::format_human;
    use crate::seed::Seed;

    fn demo_store() -> TaskStore<FixedClock> {
        let now = Utc::now();
        TaskStore::with_clock(Seed::demo(now), "m1", FixedClock::new(now)).expect("store")
    }

    #[test]
    fn board_view_flags_urgent_tasks() {
        let store = demo_store();
        let (board, human) = board_view(&store);
        assert_eq!(board.mine.len(), 1);

        let text = format_human(&human);
        assert!(text.contains("- Member: 田中 太郎 (m1)"));
        assert!(text.contains("t2 次期定例会議のアジェンダ作成 [DOING] difficulty 1"));
        assert!(text.contains("(due soon)"));
        assert!(text.contains("t3 WEBサイトのバグ修正 - 鈴木 一郎 [PLANNED] difficulty 4"));
        assert!(text.contains("(OVERDUE)"));
        assert!(text.contains("1 task(s) overdue"));
        assert!(text.contains("taskhub complete t2"));
    }

    #[test]
    fn members_view_lists_roles() {
        let store = demo_store();
        let (members, human) = members_view(&store);
        assert_eq!(members.len(), 4);
        let text = format_human(&human);
        assert!(text.contains("m4 高橋 健太 (会計)"));
    }
}
