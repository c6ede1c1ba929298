//! Subprocess runner for the external agent CLI.
//!
//! The argument vector is built directly, without a shell, so the prompt is
//! passed verbatim as the final argument whatever characters it contains.

use super::runner::{AgentRunner, RunOptions, RunnerError};
use crate::agent::AgentMode;
use crate::agent::prompt::{TemplateVars, render_template};
use crate::config::RunnerConfig;
use crate::error::{self, DelegateError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Spawns the configured agent program once per run.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    base_args: Vec<String>,
    sandbox_bypass_flag: Option<String>,
    effort_args: Vec<String>,
    model_args: Vec<String>,
}

impl CommandRunner {
    pub fn from_config(config: &RunnerConfig) -> error::Result<Self> {
        let mut words = shell_words::split(&config.command).map_err(|e| {
            DelegateError::Configuration(format!("runner.command is not valid: {}", e))
        })?;
        if words.is_empty() {
            return Err(DelegateError::Configuration(
                "runner.command must name a program".to_string(),
            ));
        }
        let program = words.remove(0);

        let flag = config.sandbox_bypass_flag.trim();
        Ok(Self {
            program,
            base_args: words,
            sandbox_bypass_flag: (!flag.is_empty()).then(|| flag.to_string()),
            effort_args: config.effort_args.clone(),
            model_args: config.model_args.clone(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The full argument vector for one invocation, program excluded.
    ///
    /// Order: base args, the sandbox bypass flag (implementation mode only),
    /// effort args, model args, then the prompt.
    pub fn build_args(
        &self,
        prompt: &str,
        options: &RunOptions,
    ) -> Result<Vec<String>, RunnerError> {
        let mut vars = TemplateVars::new();
        vars.insert("effort", options.effort.to_string());
        vars.insert("model", options.model.clone());

        let mut args = self.base_args.clone();
        if options.mode == AgentMode::Implementation
            && let Some(flag) = &self.sandbox_bypass_flag
        {
            args.push(flag.clone());
        }
        for template in self.effort_args.iter().chain(&self.model_args) {
            args.push(render_template(template, &vars)?);
        }
        args.push(prompt.to_string());
        Ok(args)
    }
}

#[async_trait]
impl AgentRunner for CommandRunner {
    async fn run(&self, prompt: &str, options: &RunOptions) -> Result<String, RunnerError> {
        let args = self.build_args(prompt, options)?;
        info!(
            program = %self.program,
            mode = %options.mode,
            effort = %options.effort,
            model = %options.model,
            "spawning agent"
        );
        debug!(argc = args.len(), prompt_bytes = prompt.len(), "agent arguments prepared");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&options.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RunnerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(RunnerError::Exit {
            status: output.status.to_string(),
            stderr: if stderr.is_empty() {
                stdout.trim().to_string()
            } else {
                stderr
            },
        })
    }
}
