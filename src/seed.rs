//! Initial roster and example tasks for a session.
//!
//! Seed files are TOML with `[[members]]` and `[[tasks]]` tables. Task
//! timestamps accept RFC 3339 or offsets from load time: `now`, `now-5d`,
//! `now+12h` (units: s, m, h, d, w).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Difficulty, Member, Task, TaskStatus};

/// Member the demo board acts as.
pub const DEMO_ACTING_MEMBER: &str = "m1";

const UNKNOWN_ASSIGNEE: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seed {
    pub members: Vec<Member>,
    /// Most recent first.
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SeedFile {
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    tasks: Vec<SeedTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeedTask {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    assignee: String,
    #[serde(default)]
    assignee_name: Option<String>,
    #[serde(default = "default_seed_difficulty")]
    difficulty: u8,
    #[serde(default = "default_seed_status")]
    status: TaskStatus,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    completed_at: Option<String>,
    #[serde(default)]
    due: Option<String>,
}

fn default_seed_difficulty() -> u8 {
    Difficulty::default().get()
}

fn default_seed_status() -> TaskStatus {
    TaskStatus::Doing
}

impl Seed {
    /// The built-in board: four officers and three example tasks whose
    /// deadlines sit relative to `now` (one done, one due soon, one overdue).
    pub fn demo(now: DateTime<Utc>) -> Self {
        let members = vec![
            Member::new("m1", "田中 太郎", "代表", "https://picsum.photos/seed/m1/100"),
            Member::new("m2", "佐藤 花子", "広報", "https://picsum.photos/seed/m2/100"),
            Member::new("m3", "鈴木 一郎", "企画", "https://picsum.photos/seed/m3/100"),
            Member::new("m4", "高橋 健太", "会計", "https://picsum.photos/seed/m4/100"),
        ];
        let tasks = vec![
            Task {
                id: "t1".to_string(),
                title: "春の新歓チラシ作成".to_string(),
                description: Some("新入生向けの広報用チラシのデザイン".to_string()),
                assignee_id: "m2".to_string(),
                assignee_name: "佐藤 花子".to_string(),
                difficulty: Difficulty(3),
                status: TaskStatus::Completed,
                created_at: now - Duration::days(5),
                completed_at: Some(now - Duration::days(2)),
                due_date: Some(now - Duration::days(1)),
            },
            Task {
                id: "t2".to_string(),
                title: "次期定例会議のアジェンダ作成".to_string(),
                description: Some("4月15日の会議用".to_string()),
                assignee_id: "m1".to_string(),
                assignee_name: "田中 太郎".to_string(),
                difficulty: Difficulty(1),
                status: TaskStatus::Doing,
                created_at: now - Duration::days(1),
                completed_at: None,
                due_date: Some(now + Duration::hours(12)),
            },
            Task {
                id: "t3".to_string(),
                title: "WEBサイトのバグ修正".to_string(),
                description: Some("トップページのリンク切れ修正".to_string()),
                assignee_id: "m3".to_string(),
                assignee_name: "鈴木 一郎".to_string(),
                difficulty: Difficulty(4),
                status: TaskStatus::Planned,
                created_at: now - Duration::days(2),
                completed_at: None,
                due_date: Some(now - Duration::hours(12)),
            },
        ];
        Self { members, tasks }
    }

    /// Load a seed file, resolving relative timestamps against `now`.
    pub fn load(path: &Path, now: DateTime<Utc>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, now).map_err(|err| match err {
            Error::InvalidConfig(msg) => {
                Error::InvalidConfig(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str, now: DateTime<Utc>) -> Result<Self> {
        let file: SeedFile = toml::from_str(content)?;
        let names: HashMap<&str, &str> = file
            .members
            .iter()
            .map(|member| (member.id.as_str(), member.name.as_str()))
            .collect();

        let mut tasks = Vec::with_capacity(file.tasks.len());
        for raw in &file.tasks {
            let difficulty = Difficulty::new(raw.difficulty).map_err(|err| {
                Error::InvalidConfig(format!("tasks.{}: {err}", raw.id))
            })?;
            let assignee_name = match (&raw.assignee_name, names.get(raw.assignee.as_str())) {
                (Some(name), _) => name.clone(),
                (None, Some(name)) => (*name).to_string(),
                (None, None) => UNKNOWN_ASSIGNEE.to_string(),
            };
            let created_at = match raw.created_at.as_deref() {
                Some(value) => seed_time(&raw.id, "created_at", value, now)?,
                None => now,
            };
            let completed_at = raw
                .completed_at
                .as_deref()
                .map(|value| seed_time(&raw.id, "completed_at", value, now))
                .transpose()?;
            let due_date = raw
                .due
                .as_deref()
                .map(|value| seed_time(&raw.id, "due", value, now))
                .transpose()?;

            tasks.push(Task {
                id: raw.id.trim().to_string(),
                title: raw.title.trim().to_string(),
                description: raw.description.clone().filter(|text| !text.trim().is_empty()),
                assignee_id: raw.assignee.trim().to_string(),
                assignee_name,
                difficulty,
                status: raw.status,
                created_at,
                completed_at,
                due_date,
            });
        }

        let seed = Self {
            members: file.members,
            tasks,
        };
        seed.validate()?;
        Ok(seed)
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Checks roster and task invariants. Tasks assigned to members outside
    /// the roster are accepted with a warning.
    pub fn validate(&self) -> Result<()> {
        let mut member_ids = HashSet::new();
        for member in &self.members {
            if member.id.trim().is_empty() {
                return Err(Error::InvalidConfig("members: id cannot be empty".to_string()));
            }
            if !member_ids.insert(member.id.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "members: duplicate id '{}'",
                    member.id
                )));
            }
        }

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if task.id.is_empty() {
                return Err(Error::InvalidConfig("tasks: id cannot be empty".to_string()));
            }
            if !task_ids.insert(task.id.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "tasks: duplicate id '{}'",
                    task.id
                )));
            }
            task.validate()
                .map_err(|err| Error::InvalidConfig(format!("tasks.{}: {err}", task.id)))?;
            if !member_ids.contains(task.assignee_id.as_str()) {
                tracing::warn!(
                    task = %task.id,
                    assignee = %task.assignee_id,
                    "seed task assigned to a member outside the roster"
                );
            }
        }
        Ok(())
    }
}

fn seed_time(task_id: &str, field: &str, value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    parse_time_spec(&format!("tasks.{task_id}.{field}"), value, now).map_err(|err| match err {
        Error::InvalidArgument(msg) => Error::InvalidConfig(msg),
        other => other,
    })
}

/// Parse an RFC 3339 timestamp or a `now[+-]<duration>` offset.
pub fn parse_time_spec(label: &str, value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Some(offset) = trimmed.strip_prefix("now") {
        let offset = offset.trim();
        if offset.is_empty() {
            return Ok(now);
        }
        let (forward, amount) = if let Some(rest) = offset.strip_prefix('+') {
            (true, rest)
        } else if let Some(rest) = offset.strip_prefix('-') {
            (false, rest)
        } else {
            return Err(Error::InvalidArgument(format!(
                "invalid {label} offset '{value}': expected now+<duration> or now-<duration>"
            )));
        };
        let duration = parse_duration(amount).map_err(|err| match err {
            Error::InvalidArgument(msg) => {
                Error::InvalidArgument(format!("invalid {label} '{value}': {msg}"))
            }
            other => other,
        })?;
        let shifted = if forward {
            now.checked_add_signed(duration)
        } else {
            now.checked_sub_signed(duration)
        };
        return shifted.ok_or_else(|| {
            Error::InvalidArgument(format!("invalid {label} '{value}': offset out of range"))
        });
    }

    let parsed = DateTime::parse_from_rfc3339(trimmed).map_err(|err| {
        Error::InvalidArgument(format!("invalid {label} timestamp '{value}': {err}"))
    })?;
    Ok(parsed.with_timezone(&Utc))
}

/// Parse durations like `30m`, `12h`, `5d`. A bare number means minutes.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Err(Error::InvalidArgument("Duration cannot be empty".to_string()));
    }

    let (num_str, unit) = if let Some(pos) = s.find(|c: char| !c.is_ascii_digit()) {
        (&s[..pos], &s[pos..])
    } else {
        (s, "m")
    };

    let num: i64 = num_str.parse().map_err(|_| {
        Error::InvalidArgument(format!("Invalid duration number: {num_str}"))
    })?;

    let duration = match unit.trim().to_lowercase().as_str() {
        "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
        "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
        "h" | "hr" | "hour" | "hours" => Duration::try_hours(num),
        "d" | "day" | "days" => Duration::try_days(num),
        "w" | "week" | "weeks" => Duration::try_weeks(num),
        _ => {
            return Err(Error::InvalidArgument(format!(
                "Invalid duration unit '{unit}'. Expected: s, m, h, d, w"
            )));
        }
    };

    duration.ok_or_else(|| Error::InvalidArgument(format!("Duration too large: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_seed_is_valid() {
        let now = Utc::now();
        let seed = Seed::demo(now);
        seed.validate().expect("demo seed valid");
        assert_eq!(seed.members.len(), 4);
        assert_eq!(seed.tasks.len(), 3);
        assert!(seed.member(DEMO_ACTING_MEMBER).is_some());
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("12h").expect("12h"), Duration::hours(12));
        assert_eq!(parse_duration("5d").expect("5d"), Duration::days(5));
        assert_eq!(parse_duration("30").expect("30"), Duration::minutes(30));
        assert!(parse_duration("3x").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("9999999999999999h").is_err());
    }

    #[test]
    fn time_spec_accepts_offsets_and_rfc3339() {
        let now = Utc::now();
        assert_eq!(parse_time_spec("due", "now", now).expect("now"), now);
        assert_eq!(
            parse_time_spec("due", "now-5d", now).expect("past"),
            now - Duration::days(5)
        );
        assert_eq!(
            parse_time_spec("due", "now + 12h", now).expect("future"),
            now + Duration::hours(12)
        );
        let fixed = parse_time_spec("due", "2024-04-15T09:00:00+09:00", now).expect("rfc3339");
        assert_eq!(fixed.to_rfc3339(), "2024-04-15T00:00:00+00:00");
        assert!(parse_time_spec("due", "tomorrow", now).is_err());
        assert!(parse_time_spec("due", "now*2d", now).is_err());
    }

    #[test]
    fn time_spec_rejects_out_of_range_offsets() {
        let now = Utc::now();
        let err = parse_time_spec("due", "now+99999999w", now).expect_err("past max date");
        assert!(matches!(err, Error::InvalidArgument(ref msg) if msg.contains("out of range")));
        assert!(parse_time_spec("due", "now-99999999w", now).is_err());
        assert!(parse_time_spec("due", "now+9999999999999999h", now).is_err());
        assert!(parse_time_spec("due", "now+99999999999999999999d", now).is_err());
    }

    #[test]
    fn oversized_seed_offset_is_config_error() {
        let err = Seed::from_toml_str(
            r#"
[[members]]
id = "m1"
name = "Taro"

[[tasks]]
id = "t1"
title = "A"
assignee = "m1"
due = "now+99999999w"
"#,
            Utc::now(),
        )
        .expect_err("oversized due");
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("tasks.t1.due")));
    }

    #[test]
    fn bad_seed_timestamp_is_config_error() {
        let err = Seed::from_toml_str(
            r#"
[[members]]
id = "m1"
name = "Taro"

[[tasks]]
id = "t1"
title = "A"
assignee = "m1"
due = "someday"
"#,
            Utc::now(),
        )
        .expect_err("bad due");
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("tasks.t1.due")));
    }

    #[test]
    fn toml_seed_snapshots_assignee_name() {
        let now = Utc::now();
        let seed = Seed::from_toml_str(
            r#"
[[members]]
id = "m1"
name = "Taro"
role = "Chair"
avatar = "a1"

[[tasks]]
id = "t1"
title = "Poster"
assignee = "m1"
difficulty = 2
status = "COMPLETED"
created_at = "now-3d"
completed_at = "now-1d"
due = "now-2d"
"#,
            now,
        )
        .expect("seed");
        let task = &seed.tasks[0];
        assert_eq!(task.assignee_name, "Taro");
        assert_eq!(task.difficulty.get(), 2);
        assert_eq!(task.completed_at, Some(now - Duration::days(1)));
        assert_eq!(task.due_date, Some(now - Duration::days(2)));
    }

    #[test]
    fn toml_seed_defaults() {
        let now = Utc::now();
        let seed = Seed::from_toml_str(
            r#"
[[members]]
id = "m1"
name = "Taro"

[[tasks]]
id = "t1"
title = "Agenda"
assignee = "m9"
"#,
            now,
        )
        .expect("seed");
        let task = &seed.tasks[0];
        assert_eq!(task.status, TaskStatus::Doing);
        assert_eq!(task.difficulty.get(), 3);
        assert_eq!(task.created_at, now);
        assert_eq!(task.assignee_name, "Unknown");
        assert!(task.due_date.is_none());
    }

    #[test]
    fn completed_without_completed_at_rejected() {
        let err = Seed::from_toml_str(
            r#"
[[members]]
id = "m1"
name = "Taro"

[[tasks]]
id = "t1"
title = "Agenda"
assignee = "m1"
status = "COMPLETED"
"#,
            Utc::now(),
        )
        .expect_err("invalid");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = Seed::from_toml_str(
            r#"
[[members]]
id = "m1"
name = "Taro"

[[members]]
id = "m1"
name = "Jiro"
"#,
            Utc::now(),
        )
        .expect_err("duplicate member");
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = Seed::from_toml_str(
            r#"
[[members]]
id = "m1"
name = "Taro"

[[tasks]]
id = "t1"
title = "A"
assignee = "m1"

[[tasks]]
id = "t1"
title = "B"
assignee = "m1"
"#,
            Utc::now(),
        )
        .expect_err("duplicate task");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn out_of_range_difficulty_rejected() {
        let err = Seed::from_toml_str(
            r#"
[[members]]
id = "m1"
name = "Taro"

[[tasks]]
id = "t1"
title = "A"
assignee = "m1"
difficulty = 7
"#,
            Utc::now(),
        )
        .expect_err("difficulty");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("seed.toml");
        std::fs::write(
            &path,
            "[[members]]\nid = \"m1\"\nname = \"Taro\"\n",
        )
        .expect("write");
        let seed = Seed::load(&path, Utc::now()).expect("load");
        assert_eq!(seed.members.len(), 1);
        assert!(seed.tasks.is_empty());
    }
}
