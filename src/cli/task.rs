//! taskhub declare and complete commands.

use serde::Serialize;

use crate::cli::board::{format_task, format_time};
use crate::cli::Context;
use crate::clock::Clock;
use crate::deadline::DeadlineStatus;
use crate::error::Result;
use crate::model::{RankingRow, Task};
use crate::output::{emit_success, HumanOutput};
use crate::seed::parse_time_spec;
use crate::store::{DeclareTask, TaskStore};

pub struct DeclareOptions {
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<u8>,
    pub due: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TaskOutput {
    pub task: Task,
    pub deadline: DeadlineStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompleteOutput {
    pub task: Task,
    pub ranking: Vec<RankingRow>,
}

pub fn run_declare(mut ctx: Context, options: DeclareOptions) -> Result<()> {
    let (output, human) = declare(&mut ctx.store, options)?;
    emit_success(ctx.output, "declare", &output, Some(&human))
}

pub fn run_complete(mut ctx: Context, id: &str) -> Result<()> {
    let (output, human) = complete(&mut ctx.store, id)?;
    emit_success(ctx.output, "complete", &output, Some(&human))
}

pub(crate) fn declare<C: Clock>(
    store: &mut TaskStore<C>,
    options: DeclareOptions,
) -> Result<(TaskOutput, HumanOutput)> {
    let mut input = DeclareTask::new(options.title);
    input.description = options.description;
    input.difficulty = options.difficulty;
    if let Some(due) = options.due.as_deref() {
        input.due_date = Some(parse_time_spec("due", due, store.now())?);
    }

    let task = store.declare(input)?.clone();
    let deadline = store.deadline(&task);

    let mut human = HumanOutput::new("Task declared");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Assignee", task.assignee_name.clone());
    human.push_summary("Difficulty", task.difficulty.to_string());
    human.push_summary("Status", task.status.to_string());
    match task.due_date {
        Some(due) => human.push_summary("Due", format!("{} ({deadline})", format_time(due))),
        None => human.push_summary("Due", "no deadline"),
    }
    human.push_next_step(format!("taskhub complete {}", task.id));

    Ok((TaskOutput { task, deadline }, human))
}

pub(crate) fn complete<C: Clock>(
    store: &mut TaskStore<C>,
    id: &str,
) -> Result<(CompleteOutput, HumanOutput)> {
    let task = store.complete(id.trim())?.clone();
    let ranking = store.ranking();

    let mut human = HumanOutput::new("Task completed");
    human.push_summary("Task", format_task(&task));
    if let Some(completed_at) = task.completed_at {
        human.push_summary("Completed at", format_time(completed_at));
    }
    if let Some((position, row)) = ranking
        .iter()
        .enumerate()
        .find(|(_, row)| row.member_id == task.assignee_id)
    {
        human.push_summary(
            "Assignee standing",
            format!(
                "#{} {} with {} pts",
                position + 1,
                row.member_name,
                row.total_score
            ),
        );
    }
    human.push_next_step("taskhub ranking");

    Ok((CompleteOutput { task, ranking }, human))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::Error;
    use crate::model::TaskStatus;
    use crate::seed::Seed;
    use chrono::{Duration, Utc};

    fn demo_store() -> TaskStore<FixedClock> {
        let now = Utc::now();
        TaskStore::with_clock(Seed::demo(now), "m1", FixedClock::new(now)).expect("store")
    }

    #[test]
    fn declare_parses_relative_due() {
        let mut store = demo_store();
        let now = store.now();
        let (output, _) = declare(
            &mut store,
            DeclareOptions {
                title: "Camp booklet".to_string(),
                description: None,
                difficulty: Some(2),
                due: Some("now+10h".to_string()),
            },
        )
        .expect("declare");
        assert_eq!(output.task.due_date, Some(now + Duration::hours(10)));
        assert_eq!(output.deadline, DeadlineStatus::Soon);
    }

    #[test]
    fn declare_rejects_bad_due() {
        let mut store = demo_store();
        let err = declare(
            &mut store,
            DeclareOptions {
                title: "Camp booklet".to_string(),
                description: None,
                difficulty: None,
                due: Some("next week".to_string()),
            },
        )
        .expect_err("bad due");
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn complete_reports_standing() {
        let mut store = demo_store();
        let (output, human) = complete(&mut store, "t2").expect("complete");
        assert_eq!(output.task.status, TaskStatus::Completed);
        let text = crate::output::format_human(&human);
        assert!(text.contains("Assignee standing: #2 田中 太郎 with 1 pts"));
    }
}
