//! Config struct definition and default implementation.

use super::types::*;
use crate::agent::EffortPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for delegation runs.
///
/// This struct represents the contents of `delegator.yaml`. Every field is
/// optional; unknown fields are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Agent settings
    // =========================================================================
    /// Model name passed to the external agent.
    #[serde(default = "default_model")]
    pub model: String,

    /// Language the agent is asked to answer in.
    #[serde(default = "default_output_language")]
    pub output_language: String,

    /// Directory holding agent prompt files, relative to the config file.
    /// Built-in agents fall back to their bundled prompts when no file is here.
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,

    /// Extra or replacement agent profiles, keyed by id.
    #[serde(default)]
    pub agents: BTreeMap<String, AgentDefinition>,

    /// Keyword rules for reasoning-effort detection.
    #[serde(default)]
    pub effort: EffortPolicy,

    // =========================================================================
    // Invocation settings
    // =========================================================================
    /// How the external agent is spawned.
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Time budget for one invocation.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// `xhigh` runs get `timeout_seconds * xhigh_timeout_multiplier`.
    #[serde(default = "default_xhigh_timeout_multiplier")]
    pub xhigh_timeout_multiplier: u32,

    /// Progress indicator refresh interval.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    // =========================================================================
    // Output settings
    // =========================================================================
    /// Parent of derived run directories, relative to the working directory.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Refuse to run outside a git work tree.
    #[serde(default = "default_true")]
    pub require_git_repository: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            output_language: default_output_language(),
            prompts_dir: default_prompts_dir(),
            agents: BTreeMap::new(),
            effort: EffortPolicy::default(),
            runner: RunnerConfig::default(),
            timeout_seconds: default_timeout_seconds(),
            xhigh_timeout_multiplier: default_xhigh_timeout_multiplier(),
            progress_interval_ms: default_progress_interval_ms(),
            output_root: default_output_root(),
            require_git_repository: default_true(),
        }
    }
}
