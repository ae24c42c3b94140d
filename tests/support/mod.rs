use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Scratch working directory for a taskhub invocation.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file(".taskhub.toml", contents)
    }

    /// A taskhub command isolated from the caller's environment and user config.
    pub fn cmd(&self) -> Command {
        let mut cmd = taskhub_cmd();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"));
        cmd
    }
}

pub fn taskhub_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskhub").expect("taskhub binary");
    cmd.env_remove("TASKHUB_MEMBER")
        .env_remove("TASKHUB_CONFIG")
        .env_remove("TASKHUB_SEED")
        .env_remove("RUST_LOG");
    cmd
}

pub fn parse_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).expect("json output")
}

pub const CLUB_SEED: &str = r#"
[[members]]
id = "a1"
name = "Aiko"
role = "lead"

[[members]]
id = "b2"
name = "Ben"

[[tasks]]
id = "t1"
title = "Print flyers"
assignee = "b2"
difficulty = 2
status = "COMPLETED"
created_at = "now-3d"
completed_at = "now-1d"

[[tasks]]
id = "t2"
title = "Book the hall"
assignee = "a1"
difficulty = 4
status = "PLANNED"
created_at = "now-1d"
due = "now-2h"
"#;
