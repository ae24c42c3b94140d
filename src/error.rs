//! Error types for taskhub
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (invalid input, unknown task, bad config or arguments)
//! - 4: Operation failed (io, parse)

use thiserror::Error;

/// Exit codes for the taskhub CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskhub operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidInput(_)
            | Error::NotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            Error::Io(_) | Error::Json(_) | Error::TomlParse(_) | Error::TomlSerialize(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }

    /// Short machine-readable error kind for JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::NotFound(_) => "not_found",
            Error::InvalidConfig(_) => "invalid_config",
            Error::InvalidArgument(_) => "invalid_argument",
            _ => "operation_failed",
        }
    }

    /// Command to suggest after this error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::NotFound(_) => Some("taskhub board"),
            Error::InvalidConfig(_) => Some("fix .taskhub.toml then retry"),
            Error::InvalidInput(_) => Some("taskhub declare \"<title>\" --difficulty <1-5>"),
            _ => None,
        }
    }
}

/// Result type alias for taskhub operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_exit_with_two() {
        assert_eq!(Error::InvalidInput("title".into()).exit_code(), 2);
        assert_eq!(Error::NotFound("t-1".into()).exit_code(), 2);
        assert_eq!(Error::InvalidConfig("x".into()).exit_code(), 2);
    }

    #[test]
    fn io_errors_exit_with_four() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
        assert_eq!(err.kind(), "operation_failed");
    }

    #[test]
    fn not_found_message_names_task() {
        let err = Error::NotFound("t-42".to_string());
        assert_eq!(err.to_string(), "Task not found: t-42");
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.hint(), Some("taskhub board"));
    }

    #[test]
    fn argument_errors_have_no_hint() {
        assert_eq!(Error::InvalidArgument("due".into()).hint(), None);
    }
}
