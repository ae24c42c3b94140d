//! In-memory task store for one session.
//!
//! The store owns the roster and the task collection (most recent first).
//! Declaring and completing are the only mutations; tasks are never removed.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use ulid::Ulid;

use crate::board::{Podium, TaskBoard};
use crate::clock::{Clock, SystemClock};
use crate::config::{ScoringConfig, TasksConfig};
use crate::deadline::{classify, DeadlineStatus};
use crate::error::{Error, Result};
use crate::model::{Difficulty, Member, RankingRow, Task, TaskStatus};
use crate::ranking::rank;
use crate::seed::Seed;

/// Input for [`TaskStore::declare`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeclareTask {
    pub title: String,
    pub description: Option<String>,
    /// Falls back to `tasks.default_difficulty` when unset.
    pub difficulty: Option<u8>,
    pub due_date: Option<DateTime<Utc>>,
}

impl DeclareTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore<C = SystemClock> {
    tasks: Vec<Task>,
    members: Vec<Member>,
    acting_member: Member,
    config: TasksConfig,
    scoring: ScoringConfig,
    clock: C,
}

impl TaskStore<SystemClock> {
    pub fn new(seed: Seed, acting_member: impl Into<String>) -> Result<Self> {
        Self::with_clock(seed, acting_member, SystemClock)
    }
}

impl<C: Clock> TaskStore<C> {
    pub fn with_clock(seed: Seed, acting_member: impl Into<String>, clock: C) -> Result<Self> {
        seed.validate()?;
        let acting_id = acting_member.into();
        let acting_member = seed.member(&acting_id).cloned().ok_or_else(|| {
            Error::InvalidConfig(format!("acting member '{acting_id}' is not on the roster"))
        })?;
        Ok(Self {
            tasks: seed.tasks,
            members: seed.members,
            acting_member,
            config: TasksConfig::default(),
            scoring: ScoringConfig::default(),
            clock,
        })
    }

    pub fn with_tasks_config(mut self, config: TasksConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.id == member_id)
    }

    pub fn acting_member(&self) -> &Member {
        &self.acting_member
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Declare a new task for the acting member. The task starts in DOING and
    /// goes to the front of the collection.
    pub fn declare(&mut self, input: DeclareTask) -> Result<&Task> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("title cannot be empty".to_string()));
        }
        let difficulty = Difficulty::new(input.difficulty.unwrap_or(self.config.default_difficulty))?;
        let description = input
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        let member = self.acting_member();
        let task = Task {
            id: self.generate_task_id(),
            title: title.to_string(),
            description,
            assignee_id: member.id.clone(),
            assignee_name: member.name.clone(),
            difficulty,
            status: TaskStatus::Doing,
            created_at: self.clock.now(),
            completed_at: None,
            due_date: input.due_date,
        };
        tracing::debug!(
            task = %task.id,
            assignee = %task.assignee_id,
            difficulty = task.difficulty.get(),
            "task declared"
        );
        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    /// Mark a task completed. Completing an already completed task keeps the
    /// original completion time.
    pub fn complete(&mut self, task_id: &str) -> Result<&Task> {
        let now = self.clock.now();
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;

        let task = &mut self.tasks[index];
        if task.is_completed() {
            tracing::debug!(task = %task.id, "task already completed");
        } else {
            task.status = TaskStatus::Completed;
            task.completed_at = Some(now);
            tracing::debug!(task = %task.id, difficulty = task.difficulty.get(), "task completed");
        }
        Ok(&self.tasks[index])
    }

    pub fn deadline(&self, task: &Task) -> DeadlineStatus {
        classify(task, self.clock.now())
    }

    pub fn ranking(&self) -> Vec<RankingRow> {
        rank(&self.tasks, &self.members, self.scoring.difficulty_weight)
    }

    pub fn podium(&self) -> Podium {
        Podium::from_rows(&self.ranking())
    }

    pub fn board(&self) -> TaskBoard {
        self.board_for(&self.acting_member.id)
    }

    pub fn board_for(&self, member_id: &str) -> TaskBoard {
        TaskBoard::build(&self.tasks, member_id, self.clock.now())
    }

    fn generate_task_id(&self) -> String {
        let existing: HashSet<&str> = self.tasks.iter().map(|task| task.id.as_str()).collect();
        let prefix = self.config.id_prefix.trim();
        loop {
            let candidate = format!("{prefix}-{}", Ulid::new().to_string().to_lowercase());
            if !existing.contains(candidate.as_str()) {
                return candidate;
            }
        }
    }
}
