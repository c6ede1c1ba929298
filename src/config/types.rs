//! Configuration sub-sections and default values.

use crate::agent::{AgentMode, AgentProfile, PromptSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the external agent binary is invoked.
///
/// The argument lists are templates rendered per run: `{effort}` and
/// `{model}` are the only placeholders. The prompt is always appended last
/// as a direct argument and is never a template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Program and base arguments, split with shell quoting rules.
    pub command: String,

    /// Flag that disables the agent's approval prompts and sandbox.
    /// Only ever passed in implementation mode.
    pub sandbox_bypass_flag: String,

    pub effort_args: Vec<String>,

    pub model_args: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: default_runner_command(),
            sandbox_bypass_flag: default_sandbox_bypass_flag(),
            effort_args: default_effort_args(),
            model_args: default_model_args(),
        }
    }
}

/// An agent declared in `delegator.yaml`.
///
/// Declaring an id that already exists replaces the built-in profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentDefinition {
    /// Display name (defaults to the id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub description: String,

    /// Prompt file relative to `prompts_dir` (defaults to `<id>.md`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_file: Option<PathBuf>,

    /// Inline prompt text; mutually exclusive with `prompt_file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    pub mode: AgentMode,

    pub triggers: Vec<String>,
}

impl AgentDefinition {
    /// Convert into a registry profile for `id`.
    pub fn to_profile(&self, id: &str) -> AgentProfile {
        let prompt_source = match (&self.prompt, &self.prompt_file) {
            (Some(text), _) => PromptSource::Inline(text.clone()),
            (None, Some(file)) => PromptSource::File(file.clone()),
            (None, None) => PromptSource::File(PathBuf::from(format!("{}.md", id))),
        };

        AgentProfile {
            id: id.to_string(),
            display_name: self.name.clone().unwrap_or_else(|| id.to_string()),
            description: self.description.clone(),
            prompt_source,
            default_mode: self.mode,
            trigger_phrases: self.triggers.clone(),
        }
    }
}

pub const CONFIG_FILE_NAME: &str = "delegator.yaml";

pub const CONFIG_ENV_VAR: &str = "DELEGATOR_CONFIG";

/// Placeholders allowed in runner argument templates.
pub const RUNNER_TEMPLATE_VARS: &[&str] = &["effort", "model"];

pub(crate) fn default_model() -> String {
    "gpt-5.2-codex".to_string()
}

pub(crate) fn default_output_language() -> String {
    "Japanese".to_string()
}

pub(crate) fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

pub(crate) fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_timeout_seconds() -> u64 {
    600
}

pub(crate) fn default_xhigh_timeout_multiplier() -> u32 {
    3
}

pub(crate) fn default_progress_interval_ms() -> u64 {
    100
}

pub(crate) fn default_runner_command() -> String {
    "codex exec".to_string()
}

pub(crate) fn default_sandbox_bypass_flag() -> String {
    "--dangerously-bypass-approvals-and-sandbox".to_string()
}

pub(crate) fn default_effort_args() -> Vec<String> {
    vec!["-c".to_string(), "reasoning.effort=\"{effort}\"".to_string()]
}

pub(crate) fn default_model_args() -> Vec<String> {
    vec!["--model".to_string(), "{model}".to_string()]
}
