//! Implementation of a delegation run.
//!
//! Input validation, agent lookup and the repository check all happen before
//! any directory is created; failures there only reach the terminal. Once the
//! orchestrator has an output directory, every failure is also recorded in
//! `error.json`.

use super::display::{self, TerminalObserver};
use crate::agent::AgentRegistry;
use crate::agent::prompt::{PromptAssembler, PromptLoader};
use crate::cli::Cli;
use crate::config::{Config, LoadedConfig};
use crate::dispatch::{CommandRunner, ProcessInvoker, SpinnerProgress};
use crate::error::{DelegateError, Result};
use crate::git;
use crate::persist::to_pretty_json;
use crate::request::DelegationRequest;
use crate::workflow::{Orchestrator, RunOutcome};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub async fn cmd_delegate(cli: &Cli, cwd: &Path) -> Result<()> {
    let request = build_request(cli, cwd)?;

    let loaded = Config::discover(cli.config.as_deref(), cwd)?;
    let registry = loaded.config.registry();
    registry.lookup(&request.agent_id)?;

    if loaded.config.require_git_repository {
        git::ensure_inside_repository(cwd)?;
    }

    let orchestrator = build_orchestrator(&loaded, registry, cwd, cli.verbose > 0)?;
    let report = orchestrator.run(&request).await?;
    info!(dir = %report.output_dir.display(), states = report.states.len(), "run finished");

    match report.outcome {
        RunOutcome::Success { record, elapsed } => {
            println!("{}", to_pretty_json(&record)?);
            display::print_success(&report.output_dir, elapsed);
            Ok(())
        }
        RunOutcome::Failure { error } => {
            display::print_failure(&report.output_dir);
            Err(error)
        }
    }
}

/// Turn command-line flags into a validated request.
///
/// `--context-file` wins over `--context`; relative paths resolve against `cwd`.
pub(crate) fn build_request(cli: &Cli, cwd: &Path) -> Result<DelegationRequest> {
    let agent = cli.agent.clone().ok_or_else(|| {
        DelegateError::Validation("--agent is required (see --list-agents)".to_string())
    })?;
    let task = cli
        .task
        .clone()
        .ok_or_else(|| DelegateError::Validation("--task is required".to_string()))?;

    let context = match &cli.context_file {
        Some(path) => Some(read_context_file(&cwd.join(path))?),
        None => cli.context.clone(),
    };

    Ok(DelegationRequest::new(agent, task)?
        .with_context(context)
        .with_constraints(cli.constraints.clone())
        .with_mode(cli.mode_override()?)
        .with_effort(cli.effort_override()?)
        .with_output_dir(cli.output.as_ref().map(|dir| cwd.join(dir))))
}

fn read_context_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        DelegateError::Validation(format!(
            "failed to read context file '{}': {}",
            path.display(),
            e
        ))
    })
}

fn build_orchestrator(
    loaded: &LoadedConfig,
    registry: AgentRegistry,
    cwd: &Path,
    verbose: bool,
) -> Result<Orchestrator> {
    let config = &loaded.config;

    let invoker = ProcessInvoker::new(
        Arc::new(CommandRunner::from_config(&config.runner)?),
        Arc::new(SpinnerProgress::new()),
        config.timeout_policy(),
        config.progress_interval(),
        config.model.clone(),
        cwd.to_path_buf(),
    );

    Ok(Orchestrator::new(
        registry,
        config.effort.clone(),
        PromptLoader::new(loaded.prompts_dir.clone()),
        PromptAssembler::new(config.output_language.clone()),
        invoker,
        loaded.output_root.clone(),
    )
    .with_observer(Arc::new(TerminalObserver::new(verbose))))
}
