//! Operating mode for a delegation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the external agent may change files.
///
/// `Advisory` agents analyze and recommend only; they never receive a
/// sandbox-relaxing flag. `Implementation` agents may be granted expanded
/// capability to make changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    #[default]
    Advisory,
    Implementation,
}

impl AgentMode {
    /// Parse a mode from its command-line spelling.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "advisory" => Some(Self::Advisory),
            "implementation" => Some(Self::Implementation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentMode::Advisory => "advisory",
            AgentMode::Implementation => "implementation",
        }
    }

    /// Whether the agent is permitted to modify files in this mode.
    pub fn allows_file_changes(&self) -> bool {
        matches!(self, AgentMode::Implementation)
    }

    /// Human-readable description used in banners and `response.md`.
    pub fn label(&self) -> &'static str {
        match self {
            AgentMode::Advisory => "Advisory (analysis and recommendations only)",
            AgentMode::Implementation => "Implementation (file changes allowed)",
        }
    }
}

impl fmt::Display for AgentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
