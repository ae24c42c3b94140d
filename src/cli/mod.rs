//! Command-line interface for taskhub
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule. Every invocation
//! starts a fresh in-memory session from the configured seed.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::actor;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::seed::Seed;
use crate::store::TaskStore;

mod board;
mod ranking;
mod session;
mod task;

/// taskhub - task board and contribution ranking
///
/// Members declare tasks, report them done, and compete on a leaderboard
/// scored by the difficulty of completed work.
#[derive(Parser, Debug)]
#[command(name = "taskhub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to .taskhub.toml in the current directory)
    #[arg(long, global = true, env = "TASKHUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed file with the roster and initial tasks (overrides the config)
    #[arg(long, global = true, env = "TASKHUB_SEED")]
    pub seed: Option<PathBuf>,

    /// Member id to act as
    #[arg(long, global = true)]
    pub member: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the task board: your tasks and other members' activity
    Board,

    /// Show the contribution ranking
    Ranking,

    /// List the member roster
    Members,

    /// Declare a new task for the acting member
    Declare {
        /// What you are going to do
        title: String,

        /// Optional details
        #[arg(short, long)]
        description: Option<String>,

        /// Difficulty from 1 (easy) to 5 (hard)
        #[arg(long)]
        difficulty: Option<u8>,

        /// Deadline: RFC 3339 or an offset such as now+2d
        #[arg(long)]
        due: Option<String>,
    },

    /// Report a task as completed
    Complete {
        /// Task id
        id: String,
    },

    /// Run line commands from stdin against one session
    Session,
}

/// Shared state for a single invocation.
pub(crate) struct Context {
    pub store: TaskStore,
    pub output: OutputOptions,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir()?;
        let ctx = load_context(
            self.config.as_deref(),
            self.seed.as_deref(),
            self.member.as_deref(),
            &cwd,
            OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        )?;

        match self.command {
            Commands::Board => board::run_board(&ctx),
            Commands::Members => board::run_members(&ctx),
            Commands::Ranking => ranking::run(&ctx),
            Commands::Declare {
                title,
                description,
                difficulty,
                due,
            } => task::run_declare(
                ctx,
                task::DeclareOptions {
                    title,
                    description,
                    difficulty,
                    due,
                },
            ),
            Commands::Complete { id } => task::run_complete(ctx, &id),
            Commands::Session => {
                let stdin = std::io::stdin();
                session::run(ctx, stdin.lock())
            }
        }
    }
}

pub(crate) fn load_context(
    config_path: Option<&Path>,
    seed_path: Option<&Path>,
    member: Option<&str>,
    cwd: &Path,
    output: OutputOptions,
) -> Result<Context> {
    let config = Config::discover(config_path, cwd)?;
    let now = Utc::now();
    let seed = match seed_path.or(config.seed.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading seed");
            Seed::load(path, now)?
        }
        None => Seed::demo(now),
    };
    let member = actor::resolve_member(&config, member);
    let store = TaskStore::new(seed, member)?
        .with_tasks_config(config.tasks.clone())
        .with_scoring(config.scoring.clone());
    Ok(Context { store, output })
}
