//! Loads an agent's base prompt text.
//!
//! Prompts for the built-in agents are compiled into the binary, so a run
//! works from any repository. A file of the same name in the prompts
//! directory replaces the bundled text.

use crate::agent::{AgentProfile, PromptSource};
use crate::error::{DelegateError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bundled prompt text, keyed by the file name a built-in profile points at.
const BUNDLED_PROMPTS: [(&str, &str); 5] = [
    ("architect.md", include_str!("../../../prompts/architect.md")),
    ("plan-reviewer.md", include_str!("../../../prompts/plan-reviewer.md")),
    ("scope-analyst.md", include_str!("../../../prompts/scope-analyst.md")),
    ("code-reviewer.md", include_str!("../../../prompts/code-reviewer.md")),
    ("security-analyst.md", include_str!("../../../prompts/security-analyst.md")),
];

fn bundled_prompt(relative: &Path) -> Option<&'static str> {
    let name = relative.to_str()?;
    BUNDLED_PROMPTS
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, text)| *text)
}

/// Resolves [`PromptSource`]s against a prompts directory.
#[derive(Debug, Clone)]
pub struct PromptLoader {
    prompts_dir: PathBuf,
}

impl PromptLoader {
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
        }
    }

    /// Return the base prompt text for `profile`.
    ///
    /// Lookup order for a file source: the prompts directory, then the
    /// bundled prompts. A prompt found in neither, or one that exists but
    /// cannot be read, is a configuration error naming the resolved path.
    pub fn load(&self, profile: &AgentProfile) -> Result<String> {
        let relative = match &profile.prompt_source {
            PromptSource::Inline(text) => return Ok(text.clone()),
            PromptSource::File(relative) => relative,
        };

        let path = self.prompts_dir.join(relative);
        if !path.exists() {
            if let Some(text) = bundled_prompt(relative) {
                debug!(agent = %profile.id, "using bundled agent prompt");
                return Ok(text.to_string());
            }
            return Err(DelegateError::Configuration(format!(
                "prompt file for agent '{}' not found: {}",
                profile.id,
                path.display()
            )));
        }

        let text = std::fs::read_to_string(&path).map_err(|e| {
            DelegateError::Configuration(format!(
                "failed to read prompt file '{}': {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), bytes = text.len(), "loaded agent prompt");
        Ok(text)
    }
}
