//! Error definitions
//!
//! This module provides error types for testkit-task. Task failures are never
//! represented here: they become failing tests. These errors only cover the
//! run machinery around the suite.

use std::io;

use thiserror::Error;

/// Main error type for testkit-task
#[derive(Error, Debug)]
pub enum Error {
    /// Writing the report to an output sink failed
    #[error("Failed to write test output: {0}")]
    Output(#[source] io::Error),

    /// The async runtime used to resolve the suite could not be started
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    /// A blocking run was started from inside an async runtime
    #[error("Cannot run a suite from inside an async runtime; await `program::execute` instead")]
    NestedRuntime,

    /// A run option could not be parsed
    #[error("Invalid value for {name}: {value:?}")]
    InvalidOption {
        /// Name of the option (environment variable)
        name: &'static str,
        /// The rejected value
        value: String,
    },
}

impl Error {
    /// Create an invalid option error.
    #[must_use]
    pub fn invalid_option(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            value: value.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let err = Error::invalid_option("TESTKIT_TASK_SEED", "abc");
        assert_eq!(
            err.to_string(),
            "Invalid value for TESTKIT_TASK_SEED: \"abc\""
        );
    }

    #[test]
    fn test_output_error_display() {
        let err = Error::Output(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.to_string(), "Failed to write test output: closed");
    }

    #[test]
    fn test_nested_runtime_display_points_to_execute() {
        let msg = Error::NestedRuntime.to_string();
        assert!(msg.contains("inside an async runtime"));
        assert!(msg.contains("program::execute"));
    }
}
