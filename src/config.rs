//! Configuration loading and management
//!
//! Handles parsing of `.taskhub.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::Difficulty;
use crate::ranking::{DEFAULT_DIFFICULTY_WEIGHT, MAX_DIFFICULTY_WEIGHT};

pub const CONFIG_FILENAME: &str = ".taskhub.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Seed file with the roster and initial tasks; the built-in demo board
    /// is used when unset. Relative paths resolve against the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<PathBuf>,

    /// Acting member configuration
    #[serde(default)]
    pub actor: ActorConfig,

    /// Ranking score configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Task declaration configuration
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Acting member configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Member id used when none is given on the command line
    #[serde(default = "default_actor")]
    pub default: String,
}

fn default_actor() -> String {
    crate::seed::DEMO_ACTING_MEMBER.to_string()
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            default: default_actor(),
        }
    }
}

/// Ranking score configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points per difficulty level of a completed task
    #[serde(default = "default_difficulty_weight")]
    pub difficulty_weight: u32,
}

fn default_difficulty_weight() -> u32 {
    DEFAULT_DIFFICULTY_WEIGHT
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            difficulty_weight: default_difficulty_weight(),
        }
    }
}

/// Task declaration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Prefix for generated task ids
    #[serde(default = "default_task_id_prefix")]
    pub id_prefix: String,

    /// Difficulty used when a declaration does not give one
    #[serde(default = "default_task_difficulty")]
    pub default_difficulty: u8,
}

fn default_task_id_prefix() -> String {
    "t".to_string()
}

fn default_task_difficulty() -> u8 {
    Difficulty::default().get()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_task_id_prefix(),
            default_difficulty: default_task_difficulty(),
        }
    }
}

impl Config {
    /// Load configuration from a `.taskhub.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.validate()?;
        if let (Some(seed), Some(parent)) = (config.seed.as_ref(), path.parent()) {
            if seed.is_relative() {
                config.seed = Some(parent.join(seed));
            }
        }
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults when the
    /// directory has no config file.
    pub fn load_from_dir(dir: &Path) -> crate::error::Result<Self> {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve configuration for a CLI invocation: an explicit path wins,
    /// then `.taskhub.toml` in `cwd`, then the user config directory.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> crate::error::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = cwd.join(CONFIG_FILENAME);
        if local.exists() {
            return Self::load(&local);
        }
        if let Some(user) = user_config_path() {
            if user.exists() {
                tracing::debug!(path = %user.display(), "using user config");
                return Self::load(&user);
            }
        }
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.actor.default.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "actor.default cannot be empty".to_string(),
            ));
        }
        if self.scoring.difficulty_weight == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "scoring.difficulty_weight must be > 0".to_string(),
            ));
        }
        if self.scoring.difficulty_weight > MAX_DIFFICULTY_WEIGHT {
            return Err(crate::error::Error::InvalidConfig(format!(
                "scoring.difficulty_weight must be <= {MAX_DIFFICULTY_WEIGHT}"
            )));
        }
        self.tasks.validate()
    }
}

impl TasksConfig {
    fn validate(&self) -> crate::error::Result<()> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_prefix cannot be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.id_prefix must be alphanumeric".to_string(),
            ));
        }
        Difficulty::new(self.default_difficulty).map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "tasks.default_difficulty must be between {} and {}",
                Difficulty::MIN,
                Difficulty::MAX
            ))
        })?;
        Ok(())
    }
}

/// `config.toml` under the platform config directory for taskhub.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "taskhub")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
