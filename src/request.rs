//! The validated input of a single delegation run.

use crate::agent::{AgentMode, EffortTier};
use crate::error::{DelegateError, Result};
use std::path::PathBuf;

/// One delegation, as requested on the command line.
///
/// Built once from validated input and never mutated during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRequest {
    pub agent_id: String,
    pub task: String,
    pub context: Option<String>,
    pub constraints: Option<String>,
    pub mode_override: Option<AgentMode>,
    pub effort_override: Option<EffortTier>,
    /// Explicit output directory. Derived from agent, date and task when absent.
    pub output_dir: Option<PathBuf>,
}

impl DelegationRequest {
    /// Create a request; the task must contain non-whitespace text.
    pub fn new(agent_id: impl Into<String>, task: impl Into<String>) -> Result<Self> {
        let agent_id = agent_id.into();
        let task = task.into();

        if agent_id.trim().is_empty() {
            return Err(DelegateError::Validation("--agent is required".to_string()));
        }
        if task.trim().is_empty() {
            return Err(DelegateError::Validation(
                "--task is required and must not be empty".to_string(),
            ));
        }

        Ok(Self {
            agent_id,
            task,
            context: None,
            constraints: None,
            mode_override: None,
            effort_override: None,
            output_dir: None,
        })
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = non_empty(context);
        self
    }

    pub fn with_constraints(mut self, constraints: Option<String>) -> Self {
        self.constraints = non_empty(constraints);
        self
    }

    pub fn with_mode(mut self, mode: Option<AgentMode>) -> Self {
        self.mode_override = mode;
        self
    }

    pub fn with_effort(mut self, effort: Option<EffortTier>) -> Self {
        self.effort_override = effort;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
