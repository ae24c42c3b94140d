//! taskhub session: line commands against one in-memory store.
//!
//! Grammar, one command per line:
//!
//! ```text
//! declare [<difficulty>] [due=<time>] <title words...>
//! complete <task-id>
//! board | ranking | members
//! ```
//!
//! A leading all-digit word after `declare` is the difficulty; without one the
//! configured default applies. Blank lines and lines starting with `#` are
//! skipped. The session stops at the first failing line.

use std::io::BufRead;

use serde::Serialize;

use crate::cli::board::{board_view, members_view};
use crate::cli::ranking::ranking_view;
use crate::cli::task::{complete, declare, DeclareOptions};
use crate::cli::Context;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::model::Difficulty;
use crate::output::{emit_success, format_human, HumanOutput};
use crate::store::TaskStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    Declare {
        difficulty: Option<u8>,
        due: Option<String>,
        title: String,
    },
    Complete(String),
    Board,
    Ranking,
    Members,
}

impl SessionCommand {
    fn name(&self) -> &'static str {
        match self {
            SessionCommand::Declare { .. } => "declare",
            SessionCommand::Complete(_) => "complete",
            SessionCommand::Board => "board",
            SessionCommand::Ranking => "ranking",
            SessionCommand::Members => "members",
        }
    }
}

#[derive(Debug, Serialize)]
struct SessionStep {
    line: usize,
    command: &'static str,
    data: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct SessionOutput {
    steps: Vec<SessionStep>,
    tasks: usize,
}

pub fn run(mut ctx: Context, input: impl BufRead) -> Result<()> {
    let mut steps = Vec::new();
    let mut printed = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let Some(command) = parse_line(&line).map_err(|err| at_line(err, line_no))? else {
            continue;
        };
        tracing::debug!(line = line_no, command = command.name(), "session command");

        let (data, human) =
            execute(&mut ctx.store, command.clone()).map_err(|err| at_line(err, line_no))?;
        if !ctx.output.json && !ctx.output.quiet {
            if printed > 0 {
                println!();
            }
            println!("{}", format_human(&human));
            printed += 1;
        }
        steps.push(SessionStep {
            line: line_no,
            command: command.name(),
            data,
        });
    }

    if ctx.output.json {
        let output = SessionOutput {
            tasks: ctx.store.tasks().len(),
            steps,
        };
        emit_success(ctx.output, "session", &output, None)?;
    }
    Ok(())
}

pub(crate) fn parse_line(line: &str) -> Result<Option<SessionCommand>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut words = trimmed.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let command = match verb {
        "declare" => {
            let mut rest: Vec<&str> = words.collect();
            let difficulty = match rest.first() {
                Some(word) if word.chars().all(|ch| ch.is_ascii_digit()) => {
                    let level = parse_difficulty(word)?;
                    rest.remove(0);
                    Some(level)
                }
                _ => None,
            };
            let due = match rest.first().and_then(|word| word.strip_prefix("due=")) {
                Some(value) => {
                    let value = value.to_string();
                    rest.remove(0);
                    Some(value)
                }
                None => None,
            };
            SessionCommand::Declare {
                difficulty,
                due,
                title: rest.join(" "),
            }
        }
        "complete" => {
            let id = words
                .next()
                .ok_or_else(|| Error::InvalidArgument("complete needs a task id".to_string()))?;
            SessionCommand::Complete(id.to_string())
        }
        "board" => SessionCommand::Board,
        "ranking" => SessionCommand::Ranking,
        "members" => SessionCommand::Members,
        other => {
            return Err(Error::InvalidArgument(format!(
                "unknown session command '{other}' (expected declare|complete|board|ranking|members)"
            )))
        }
    };
    Ok(Some(command))
}

fn execute<C: Clock>(
    store: &mut TaskStore<C>,
    command: SessionCommand,
) -> Result<(serde_json::Value, HumanOutput)> {
    match command {
        SessionCommand::Declare {
            difficulty,
            due,
            title,
        } => {
            let (output, human) = declare(
                store,
                DeclareOptions {
                    title,
                    description: None,
                    difficulty,
                    due,
                },
            )?;
            Ok((serde_json::to_value(output)?, human))
        }
        SessionCommand::Complete(id) => {
            let (output, human) = complete(store, &id)?;
            Ok((serde_json::to_value(output)?, human))
        }
        SessionCommand::Board => {
            let (board, human) = board_view(store);
            Ok((serde_json::to_value(board)?, human))
        }
        SessionCommand::Ranking => {
            let (output, human) = ranking_view(store);
            Ok((serde_json::to_value(output)?, human))
        }
        SessionCommand::Members => {
            let (members, human) = members_view(store);
            Ok((serde_json::to_value(members)?, human))
        }
    }
}

fn parse_difficulty(word: &str) -> Result<u8> {
    word.parse::<u8>()
        .ok()
        .filter(|level| (Difficulty::MIN..=Difficulty::MAX).contains(level))
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "difficulty must be between {} and {}, got {word}",
                Difficulty::MIN,
                Difficulty::MAX
            ))
        })
}

fn at_line(err: Error, line: usize) -> Error {
    match err {
        Error::InvalidArgument(msg) => Error::InvalidArgument(format!("line {line}: {msg}")),
        Error::InvalidInput(msg) => Error::InvalidInput(format!("line {line}: {msg}")),
        other => other,
    }
}
