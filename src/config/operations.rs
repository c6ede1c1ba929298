//! Config loading, discovery, validation, and derived values.

use super::model::Config;
use super::types::{CONFIG_FILE_NAME, RUNNER_TEMPLATE_VARS};
use crate::agent::AgentRegistry;
use crate::agent::prompt::check_template;
use crate::dispatch::TimeoutPolicy;
use crate::error::{DelegateError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` or `DELEGATOR_CONFIG`.
    Explicit(PathBuf),
    /// `delegator.yaml` found in the working directory.
    Discovered(PathBuf),
    /// No file; built-in defaults.
    Defaults,
}

/// A validated config plus the directories its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
    /// Absolute or cwd-relative prompts directory.
    pub prompts_dir: PathBuf,
    /// Parent of derived run directories.
    pub output_root: PathBuf,
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DelegateError::Configuration(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            DelegateError::Configuration(msg) => {
                DelegateError::Configuration(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parse config from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            DelegateError::Configuration(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Locate and load the active configuration.
    ///
    /// Lookup order: the explicit path, then `delegator.yaml` in `cwd`, then
    /// built-in defaults. `prompts_dir` resolves against the config file's
    /// directory (or `cwd` without a file); `output_root` resolves against
    /// `cwd`.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedConfig> {
        let (config, source, base_dir) = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(DelegateError::Configuration(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                let config = Self::load(&path)?;
                let base_dir = parent_dir(&path, cwd);
                (config, ConfigSource::Explicit(path), base_dir)
            }
            None => {
                let candidate = cwd.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    let config = Self::load(&candidate)?;
                    (config, ConfigSource::Discovered(candidate), cwd.to_path_buf())
                } else {
                    (Self::default(), ConfigSource::Defaults, cwd.to_path_buf())
                }
            }
        };

        debug!(source = ?source, "configuration loaded");

        Ok(LoadedConfig {
            prompts_dir: base_dir.join(&config.prompts_dir),
            output_root: cwd.join(&config.output_root),
            config,
            source,
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `model` must be non-empty
    /// - `timeout_seconds` and `progress_interval_ms` must be positive
    /// - `xhigh_timeout_multiplier` must be at least 2 so `xhigh` runs always
    ///   get a longer budget, and the product must not overflow
    /// - `runner.command` must name a program
    /// - the sandbox bypass flag must not appear in the base command or in
    ///   the argument templates, so only implementation mode can pass it
    /// - argument templates may only use `{effort}` and `{model}`
    /// - agent definitions set at most one of `prompt` and `prompt_file`
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| {
            Err(DelegateError::Configuration(format!(
                "config validation failed: {}",
                msg
            )))
        };

        if self.model.trim().is_empty() {
            return fail("model must not be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return fail("timeout_seconds must be greater than 0".to_string());
        }
        if self.xhigh_timeout_multiplier < 2 {
            return fail("xhigh_timeout_multiplier must be at least 2".to_string());
        }
        if self
            .timeout_seconds
            .checked_mul(u64::from(self.xhigh_timeout_multiplier))
            .is_none()
        {
            return fail("timeout_seconds * xhigh_timeout_multiplier overflows".to_string());
        }
        if self.progress_interval_ms == 0 {
            return fail("progress_interval_ms must be greater than 0".to_string());
        }

        let base = match shell_words::split(&self.runner.command) {
            Ok(words) => words,
            Err(e) => return fail(format!("runner.command is not valid: {}", e)),
        };
        if base.is_empty() {
            return fail("runner.command must name a program".to_string());
        }

        let flag = self.runner.sandbox_bypass_flag.trim();
        if !flag.is_empty() {
            let templates = self.runner.effort_args.iter().chain(&self.runner.model_args);
            if base.iter().chain(templates).any(|arg| arg.contains(flag)) {
                return fail(format!(
                    "runner.sandbox_bypass_flag '{}' must not appear in runner.command or argument templates",
                    flag
                ));
            }
        }

        for (name, args) in [
            ("runner.effort_args", &self.runner.effort_args),
            ("runner.model_args", &self.runner.model_args),
        ] {
            for arg in args {
                if let Err(e) = check_template(arg, RUNNER_TEMPLATE_VARS) {
                    return fail(format!("{} entry '{}': {}", name, arg, e));
                }
            }
        }

        if let Err(msg) = self.effort.validate() {
            return fail(msg);
        }

        for (id, agent) in &self.agents {
            if id.trim().is_empty() {
                return fail("agent ids must be non-empty".to_string());
            }
            if agent.prompt.is_some() && agent.prompt_file.is_some() {
                return fail(format!(
                    "agents.{}: set either prompt or prompt_file, not both",
                    id
                ));
            }
        }

        Ok(())
    }

    /// The agent catalog: built-ins overlaid with configured agents.
    pub fn registry(&self) -> AgentRegistry {
        AgentRegistry::builtin().with_overrides(
            self.agents
                .iter()
                .map(|(id, definition)| definition.to_profile(id)),
        )
    }

    pub fn timeout_policy(&self) -> TimeoutPolicy {
        TimeoutPolicy::new(
            Duration::from_secs(self.timeout_seconds),
            self.xhigh_timeout_multiplier,
        )
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

fn parent_dir(path: &Path, cwd: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => cwd.to_path_buf(),
    }
}
