//! Error types for the delegator.
//!
//! Uses thiserror for derive macros and keeps every message actionable for
//! the operator reading the terminal or `error.json`.

use crate::exit_codes;
use crate::workflow::RunState;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for delegation runs.
///
/// Every variant maps to an exit code. `Timeout` and `Process` always carry
/// the elapsed wall-clock time of the invocation.
#[derive(Error, Debug)]
pub enum DelegateError {
    /// Missing or invalid input from the command line.
    #[error("{0}")]
    Validation(String),

    /// The requested agent id is not in the catalog.
    #[error("unknown agent '{id}'\nAvailable agents: {}", .available.join(", "))]
    UnknownAgent { id: String, available: Vec<String> },

    /// A configured resource (config file, prompt file) is missing or invalid.
    #[error("{0}")]
    Configuration(String),

    /// The external agent exceeded its time budget.
    #[error(
        "agent timed out after {}s (elapsed {:.1}s)",
        .timeout.as_secs(),
        .elapsed.as_secs_f64()
    )]
    Timeout { timeout: Duration, elapsed: Duration },

    /// The external agent exited unsuccessfully or could not be reached.
    #[error("agent process failed after {:.1}s: {message}", .elapsed.as_secs_f64())]
    Process { message: String, elapsed: Duration },

    /// An artifact could not be written to the output directory.
    #[error("failed to write '{}': {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A run record could not be serialized.
    #[error("failed to serialize run record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The workflow attempted to move backwards or skip a required state.
    #[error("invalid workflow transition {from} -> {to}")]
    InvalidTransition { from: RunState, to: RunState },
}

impl DelegateError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DelegateError::Validation(_)
            | DelegateError::UnknownAgent { .. }
            | DelegateError::Configuration(_)
            | DelegateError::Timeout { .. }
            | DelegateError::Process { .. }
            | DelegateError::Persistence { .. }
            | DelegateError::Serialization(_)
            | DelegateError::InvalidTransition { .. } => exit_codes::FAILURE,
        }
    }

    /// Elapsed invocation time, for errors raised by the agent process.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            DelegateError::Timeout { elapsed, .. } | DelegateError::Process { elapsed, .. } => {
                Some(*elapsed)
            }
            _ => None,
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DelegateError::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for delegator operations.
pub type Result<T> = std::result::Result<T, DelegateError>;
