//! Agent profile catalog.
//!
//! The registry is a read-only value built once at startup: the five
//! built-in experts, optionally overlaid with profiles from `delegator.yaml`.
//! Lookup is by exact, case-sensitive id.

use super::mode::AgentMode;
use crate::error::{DelegateError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where an agent's base instruction text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// Markdown file, relative to the configured prompts directory.
    File(PathBuf),
    /// Prompt text embedded directly in the configuration.
    Inline(String),
}

/// A named expert persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    /// Unique key used on the command line (e.g. `code-reviewer`).
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub prompt_source: PromptSource,
    /// Mode used when the caller does not pass `--mode`.
    pub default_mode: AgentMode,
    /// Phrases this expert is suited for. Informational only; selection is
    /// always by explicit id.
    pub trigger_phrases: Vec<String>,
}

impl AgentProfile {
    fn builtin(
        id: &str,
        display_name: &str,
        description: &str,
        default_mode: AgentMode,
        triggers: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            prompt_source: PromptSource::File(PathBuf::from(format!("{}.md", id))),
            default_mode,
            trigger_phrases: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Catalog of agent profiles keyed by id.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<String, AgentProfile>,
}

impl AgentRegistry {
    /// The built-in expert catalog.
    pub fn builtin() -> Self {
        Self::from_profiles([
            AgentProfile::builtin(
                "architect",
                "Architect",
                "System design expert",
                AgentMode::Implementation,
                &[
                    "design",
                    "architecture",
                    "structure",
                    "technology selection",
                    "DB design",
                    "API design",
                ],
            ),
            AgentProfile::builtin(
                "plan-reviewer",
                "Plan Reviewer",
                "Implementation plan validation expert",
                AgentMode::Advisory,
                &["plan", "review", "verify", "check"],
            ),
            AgentProfile::builtin(
                "scope-analyst",
                "Scope Analyst",
                "Scope and requirements analysis expert",
                AgentMode::Advisory,
                &["scope", "requirements", "ambiguous", "improve", "consider"],
            ),
            AgentProfile::builtin(
                "code-reviewer",
                "Code Reviewer",
                "Code review expert",
                AgentMode::Advisory,
                &["code review", "PR review", "code check"],
            ),
            AgentProfile::builtin(
                "security-analyst",
                "Security Analyst",
                "Security analysis expert",
                AgentMode::Advisory,
                &["security", "vulnerability", "authentication", "authorization", "OWASP"],
            ),
        ])
    }

    /// Build a registry from explicit profiles. Later duplicates replace earlier ones.
    pub fn from_profiles(profiles: impl IntoIterator<Item = AgentProfile>) -> Self {
        let agents = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();
        Self { agents }
    }

    /// Add or replace profiles, keyed by id.
    pub fn with_overrides(mut self, profiles: impl IntoIterator<Item = AgentProfile>) -> Self {
        for profile in profiles {
            self.agents.insert(profile.id.clone(), profile);
        }
        self
    }

    /// Look up a profile by exact id.
    ///
    /// The error lists every valid id so the caller can show them.
    pub fn lookup(&self, id: &str) -> Result<&AgentProfile> {
        self.agents
            .get(id)
            .ok_or_else(|| DelegateError::UnknownAgent {
                id: id.to_string(),
                available: self.ids().map(String::from).collect(),
            })
    }

    /// All agent ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    /// Iterate over all profiles in id order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentProfile> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
