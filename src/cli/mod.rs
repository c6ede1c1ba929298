//! CLI argument parsing for `delegate`.
//!
//! Uses clap derive macros for declarative argument definitions. Values
//! with a closed set of spellings (`--mode`, `--effort`) are kept as strings
//! here and parsed by the accessors below, so a bad value is a validation
//! error with exit code 1 like every other input problem.

use crate::agent::{AgentMode, EffortTier};
use crate::config::CONFIG_ENV_VAR;
use crate::error::{DelegateError, Result};
use crate::exit_codes;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Delegate a task to an expert reasoning agent.
///
/// Selects an expert profile, detects the reasoning effort the task needs,
/// builds a structured prompt, runs the external agent under a timeout, and
/// saves the prompt, response and result record to a run directory.
#[derive(Parser, Debug)]
#[command(name = "delegate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Expert agent id (see --list-agents).
    #[arg(short = 'a', long)]
    pub agent: Option<String>,

    /// Task for the expert.
    #[arg(short = 't', long)]
    pub task: Option<String>,

    /// Additional context, passed to the expert verbatim.
    #[arg(short = 'x', long)]
    pub context: Option<String>,

    /// Read additional context from a file (takes precedence over --context).
    #[arg(short = 'f', long, value_name = "PATH")]
    pub context_file: Option<PathBuf>,

    /// Constraints the expert must respect.
    #[arg(short = 'c', long)]
    pub constraints: Option<String>,

    /// Output directory (default: <output_root>/<agent>-<YYYYMMDD>-<task>).
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Operating mode: advisory or implementation (default: the agent's).
    #[arg(short = 'm', long)]
    pub mode: Option<String>,

    /// Reasoning effort: minimal, low, medium, high, xhigh, or auto.
    #[arg(short = 'e', long, default_value = "auto")]
    pub effort: String,

    /// Path to delegator.yaml.
    #[arg(long, value_name = "PATH", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// List available agents and exit.
    #[arg(short = 'l', long)]
    pub list_agents: bool,

    /// Increase verbosity (-v, -vv, -vvv).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// `--help` and `--version` exit 0; any other parse error exits 1.
    pub fn parse_args() -> Self {
        match Cli::try_parse() {
            Ok(cli) => cli,
            Err(err) => {
                let code = if err.use_stderr() {
                    exit_codes::FAILURE
                } else {
                    exit_codes::SUCCESS
                };
                let _ = err.print();
                std::process::exit(code);
            }
        }
    }

    /// The `--mode` override, if any.
    pub fn mode_override(&self) -> Result<Option<AgentMode>> {
        self.mode
            .as_deref()
            .map(|mode| {
                AgentMode::from_str(mode).ok_or_else(|| {
                    DelegateError::Validation(format!(
                        "invalid --mode '{}' (expected advisory or implementation)",
                        mode
                    ))
                })
            })
            .transpose()
    }

    /// The `--effort` override; `auto` means none.
    pub fn effort_override(&self) -> Result<Option<EffortTier>> {
        if self.effort == "auto" {
            return Ok(None);
        }
        EffortTier::from_str(&self.effort).map(Some).ok_or_else(|| {
            DelegateError::Validation(format!(
                "invalid --effort '{}' (expected minimal, low, medium, high, xhigh or auto)",
                self.effort
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_short_flags() {
        let cli = Cli::try_parse_from([
            "delegate",
            "-a",
            "architect",
            "-t",
            "Design the cache",
            "-x",
            "Redis today",
            "-c",
            "No new services",
            "-o",
            "out/run",
            "-m",
            "advisory",
            "-e",
            "high",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.agent.as_deref(), Some("architect"));
        assert_eq!(cli.task.as_deref(), Some("Design the cache"));
        assert_eq!(cli.context.as_deref(), Some("Redis today"));
        assert_eq!(cli.constraints.as_deref(), Some("No new services"));
        assert_eq!(cli.output, Some(PathBuf::from("out/run")));
        assert_eq!(cli.mode_override().unwrap(), Some(AgentMode::Advisory));
        assert_eq!(cli.effort_override().unwrap(), Some(EffortTier::High));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.list_agents);
    }

    #[test]
    fn parse_long_flags() {
        let cli = Cli::try_parse_from([
            "delegate",
            "--agent",
            "code-reviewer",
            "--task",
            "Review",
            "--context-file",
            "ctx.md",
            "--config",
            "custom.yaml",
        ])
        .unwrap();

        assert_eq!(cli.context_file, Some(PathBuf::from("ctx.md")));
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    }

    #[test]
    fn defaults_are_auto_and_agent_mode() {
        let cli = Cli::try_parse_from(["delegate", "-a", "architect", "-t", "x"]).unwrap();
        assert_eq!(cli.effort_override().unwrap(), None);
        assert_eq!(cli.mode_override().unwrap(), None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn list_agents_needs_no_other_flags() {
        let cli = Cli::try_parse_from(["delegate", "-l"]).unwrap();
        assert!(cli.list_agents);
        assert!(cli.agent.is_none());
    }

    #[test]
    fn invalid_mode_and_effort_are_validation_errors() {
        let cli =
            Cli::try_parse_from(["delegate", "-a", "a", "-t", "t", "-m", "write", "-e", "max"])
                .unwrap();
        assert!(matches!(
            cli.mode_override(),
            Err(DelegateError::Validation(_))
        ));
        let err = cli.effort_override().unwrap_err();
        assert!(err.to_string().contains("invalid --effort 'max'"));
    }

    #[test]
    fn effort_values_are_case_sensitive() {
        let cli = Cli::try_parse_from(["delegate", "-e", "HIGH"]).unwrap();
        assert!(cli.effort_override().is_err());
    }
}
