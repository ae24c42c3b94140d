//! taskhub - Task Board and Contribution Ranking Library
//!
//! This library provides the core functionality for the taskhub CLI tool:
//! members declare tasks, report them done, and earn points on a ranking
//! weighted by task difficulty.
//!
//! # Core Concepts
//!
//! - **Tasks**: Work a member declared, with difficulty 1-5 and an optional deadline
//! - **Deadlines**: Open tasks are normal, due soon (within 48h) or overdue
//! - **Ranking**: Points per member from completed tasks, recomputed on demand
//! - **Seed**: The member roster and initial tasks a session starts from
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.taskhub.toml`
//! - `error`: Error types and result aliases
//! - `model`: Members, tasks, difficulty and ranking rows
//! - `store`: The in-memory task store and its declare/complete operations
//! - `deadline`: Deadline classification
//! - `ranking`: Contribution ranking aggregation
//! - `board`: Board partitioning and the ranking podium
//! - `seed`: Demo data and seed file loading
//! - `actor`: Acting member resolution
//! - `clock`: Injectable time source

pub mod actor;
pub mod board;
pub mod cli;
pub mod clock;
pub mod config;
pub mod deadline;
pub mod error;
pub mod model;
pub mod output;
pub mod ranking;
pub mod seed;
pub mod store;

pub use error::{Error, Result};
pub use model::{Difficulty, Member, RankingRow, Task, TaskStatus};
pub use seed::Seed;
pub use store::{DeclareTask, TaskStore};
