//! Acting member resolution.
//!
//! Resolution order:
//! 1) CLI --member (explicit)
//! 2) TASKHUB_MEMBER environment variable
//! 3) Config default (actor.default)

use crate::config::Config;

pub const MEMBER_ENV: &str = "TASKHUB_MEMBER";

/// Resolve the acting member id from the CLI flag, environment and config.
pub fn resolve_member(config: &Config, cli_member: Option<&str>) -> String {
    if let Some(member) = non_empty(cli_member) {
        return member.to_string();
    }

    if let Ok(env_member) = std::env::var(MEMBER_ENV) {
        if let Some(member) = non_empty(Some(env_member.as_str())) {
            return member.to_string();
        }
    }

    config.actor.default.trim().to_string()
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_member_wins() {
        let config = Config::default();
        assert_eq!(resolve_member(&config, Some(" m3 ")), "m3");
    }

    #[test]
    fn blank_flag_falls_through() {
        let mut config = Config::default();
        config.actor.default = "m4".to_string();
        if std::env::var(MEMBER_ENV).is_err() {
            assert_eq!(resolve_member(&config, Some("  ")), "m4");
        }
    }
}
