//! Output for taskhub commands: a text block for people, a versioned JSON
//! envelope for scripts.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "taskhub.v1";

const EMPTY_SECTION: &str = "(none)";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
struct Section {
    title: String,
    items: Vec<String>,
    /// Printed under the title when `items` is empty; `None` hides the section.
    placeholder: Option<&'static str>,
}

/// Text block printed by a command: a header line, `key: value` facts,
/// titled lists, then warnings and suggested next commands.
#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    sections: Vec<Section>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            sections: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    /// Add a titled list. Empty lists still print, as `(none)`.
    pub fn push_section(&mut self, title: impl Into<String>, items: Vec<String>) {
        self.sections.push(Section {
            title: title.into(),
            items,
            placeholder: Some(EMPTY_SECTION),
        });
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }

    fn trailing_sections(&self) -> [Section; 2] {
        [
            Section {
                title: "Warnings".to_string(),
                items: self.warnings.clone(),
                placeholder: None,
            },
            Section {
                title: "Next steps".to_string(),
                items: self.next_steps.clone(),
                placeholder: None,
            },
        ]
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n\n{}:", self.title)?;
        if self.items.is_empty() {
            if let Some(placeholder) = self.placeholder {
                write!(f, "\n  {placeholder}")?;
            }
        }
        for item in &self.items {
            write!(f, "\n- {item}")?;
        }
        Ok(())
    }
}

impl fmt::Display for HumanOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        if !self.summary.is_empty() {
            f.write_str("\n\nSummary:")?;
            for (key, value) in &self.summary {
                write!(f, "\n- {key}: {value}")?;
            }
        }
        let trailing = self.trailing_sections();
        for section in self.sections.iter().chain(trailing.iter()) {
            if section.items.is_empty() && section.placeholder.is_none() {
                continue;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

pub fn format_human(output: &HumanOutput) -> String {
    output.to_string()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
        }
    }
}

/// JSON document written to stdout. Exactly one of `data` and `error` is set.
#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    next_steps: Vec<String>,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    fn success(command: &'a str, data: &'a T, human: Option<&HumanOutput>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data: Some(data),
            error: None,
            warnings: human.map(|h| h.warnings.clone()).unwrap_or_default(),
            next_steps: human.map(|h| h.next_steps.clone()).unwrap_or_default(),
        }
    }
}

impl<'a> Envelope<'a, ()> {
    fn failure(command: &'a str, err: &Error) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            data: None,
            error: Some(ErrorBody::from(err)),
            warnings: Vec::new(),
            next_steps: err.hint().map(str::to_string).into_iter().collect(),
        }
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        println!("{}", render_json(command, data, human)?);
    } else if let (false, Some(human)) = (options.quiet, human) {
        println!("{human}");
    }
    Ok(())
}

pub fn render_json<T: Serialize>(
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Envelope::success(
        command, data, human,
    ))?)
}

/// Report a failed command: the error envelope on stdout in JSON mode,
/// otherwise `error:` and `hint:` lines on stderr.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&Envelope::failure(command, err))?
        );
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = err.hint() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Global flags that consume the following argument.
const VALUE_FLAGS: [&str; 3] = ["--config", "--member", "--seed"];

/// Best-effort subcommand name for error envelopes, read before clap runs.
pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

fn command_name_from(mut args: impl Iterator<Item = String>) -> String {
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
        } else if !arg.starts_with('-') {
            return arg;
        }
    }
    "taskhub".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_output_renders_sections() {
        let mut human = HumanOutput::new("Task board");
        human.push_summary("Member", "m1");
        human.push_section("My tasks", vec!["t2 agenda".to_string()]);
        human.push_section("Members' activity", Vec::new());
        human.push_warning("1 task overdue");

        let text = format_human(&human);
        assert_eq!(
            text,
            "Task board\n\nSummary:\n- Member: m1\n\nMy tasks:\n- t2 agenda\n\n\
             Members' activity:\n  (none)\n\nWarnings:\n- 1 task overdue"
        );
    }

    #[test]
    fn bare_header_renders_alone() {
        assert_eq!(format_human(&HumanOutput::new("Members")), "Members");
    }

    #[test]
    fn json_envelope_wraps_data() {
        let mut human = HumanOutput::new("x");
        human.push_next_step("taskhub ranking");
        let json = render_json("board", &serde_json::json!({"total": 3}), Some(&human))
            .expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["command"], "board");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["total"], 3);
        assert_eq!(value["next_steps"][0], "taskhub ranking");
        assert!(value.get("warnings").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_envelope_carries_kind_and_hint() {
        let err = Error::NotFound("t9".to_string());
        let envelope = Envelope::failure("complete", &err);
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["kind"], "not_found");
        assert_eq!(value["error"]["code"], 2);
        assert_eq!(value["error"]["message"], "Task not found: t9");
        assert_eq!(value["next_steps"][0], "taskhub board");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn command_name_skips_flag_values() {
        let args = ["--config", "club.toml", "--json", "ranking"].map(String::from);
        assert_eq!(command_name_from(args.into_iter()), "ranking");
        assert_eq!(command_name_from(std::iter::empty()), "taskhub");
    }
}
