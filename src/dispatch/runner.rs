//! The external agent capability.

use crate::agent::prompt::TemplateError;
use crate::agent::{AgentMode, EffortTier};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Per-invocation options handed to a runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: AgentMode,
    pub effort: EffortTier,
    pub model: String,
    /// Directory the agent runs in (the repository being discussed).
    pub working_dir: PathBuf,
}

/// Why a runner produced no response.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("agent exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("invalid runner argument template: {0}")]
    Template(#[from] TemplateError),
}

/// Runs one prompt through the external reasoning agent.
///
/// Implementations must be cancel-safe: dropping the returned future stops
/// the underlying work.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, prompt: &str, options: &RunOptions) -> Result<String, RunnerError>;
}
