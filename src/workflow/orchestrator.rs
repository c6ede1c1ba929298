//! The seven-step delegation workflow.

use super::state::{RunState, StateMachine, Verdict};
use crate::agent::prompt::{PromptAssembler, PromptLoader};
use crate::agent::{AgentMode, AgentProfile, AgentRegistry, EffortDecision, EffortPolicy};
use crate::dispatch::{Invocation, ProcessInvoker};
use crate::error::{DelegateError, Result};
use crate::exit_codes;
use crate::persist::{ResultPersister, ResultRecord, RunSummary, resolve_output_dir};
use crate::request::DelegationRequest;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// What the operator is told before the agent is invoked.
#[derive(Debug, Clone)]
pub struct DelegationNotice<'a> {
    pub agent: &'a AgentProfile,
    pub task: &'a str,
    pub mode: AgentMode,
    pub effort: EffortDecision,
    pub timeout: Duration,
    pub output_dir: &'a Path,
}

/// Receives workflow events. Every method defaults to doing nothing.
pub trait RunObserver: Send + Sync {
    fn on_state(&self, _state: RunState) {}

    fn on_delegation(&self, _notice: &DelegationNotice<'_>) {}
}

/// Ignores all workflow events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Final outcome of a run that reached its output directory.
#[derive(Debug)]
pub enum RunOutcome {
    Success {
        record: ResultRecord,
        elapsed: Duration,
    },
    Failure {
        error: DelegateError,
    },
}

#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub output_dir: PathBuf,
    /// Every state the run passed through, starting with `Start`.
    pub states: Vec<RunState>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Success { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            RunOutcome::Success { .. } => exit_codes::SUCCESS,
            RunOutcome::Failure { error } => error.exit_code(),
        }
    }
}

/// Sequences one delegation from agent lookup to persisted outcome.
pub struct Orchestrator {
    registry: AgentRegistry,
    policy: EffortPolicy,
    loader: PromptLoader,
    assembler: PromptAssembler,
    invoker: ProcessInvoker,
    output_root: PathBuf,
    observer: Arc<dyn RunObserver>,
}

impl Orchestrator {
    pub fn new(
        registry: AgentRegistry,
        policy: EffortPolicy,
        loader: PromptLoader,
        assembler: PromptAssembler,
        invoker: ProcessInvoker,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            policy,
            loader,
            assembler,
            invoker,
            output_root: output_root.into(),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the workflow once.
    ///
    /// Errors that happen before the output directory exists (unknown agent,
    /// directory creation) are returned as `Err` and leave nothing on disk.
    /// Every later failure is written to `error.json` and reported as
    /// [`RunOutcome::Failure`]. `Err` after that point means the error record
    /// itself could not be written.
    pub async fn run(&self, request: &DelegationRequest) -> Result<RunReport> {
        let mut machine = StateMachine::new();

        let profile = self.registry.lookup(&request.agent_id)?;
        self.enter(&mut machine, RunState::Identified)?;
        info!(agent = %profile.id, "expert identified");

        let output_dir = resolve_output_dir(
            request.output_dir.as_deref(),
            &self.output_root,
            &profile.id,
            &request.task,
            Utc::now().date_naive(),
        );
        let persister = ResultPersister::new(&output_dir);
        persister.prepare()?;
        debug!(dir = %output_dir.display(), "output directory ready");

        let executed = self
            .execute(&mut machine, profile, request, &output_dir)
            .await;

        let outcome = match executed {
            Ok((summary, invocation)) => {
                match persister.save_success(&summary, &invocation.response, invocation.elapsed) {
                    Ok(record) => {
                        self.enter(&mut machine, RunState::Persisted(Verdict::Success))?;
                        RunOutcome::Success {
                            record,
                            elapsed: invocation.elapsed,
                        }
                    }
                    Err(error) => self.fail(&mut machine, &persister, request, error)?,
                }
            }
            Err(error) => self.fail(&mut machine, &persister, request, error)?,
        };

        self.enter(&mut machine, RunState::End)?;

        Ok(RunReport {
            outcome,
            output_dir,
            states: machine.into_history(),
        })
    }

    /// Steps 2 to 6.
    async fn execute(
        &self,
        machine: &mut StateMachine,
        profile: &AgentProfile,
        request: &DelegationRequest,
        output_dir: &Path,
    ) -> Result<(RunSummary, Invocation)> {
        let base_prompt = self.loader.load(profile)?;
        self.enter(machine, RunState::PromptLoaded)?;

        let mode = request.mode_override.unwrap_or(profile.default_mode);
        self.enter(machine, RunState::ModeSelected)?;
        debug!(mode = %mode, overridden = request.mode_override.is_some(), "mode selected");

        let effort = self.policy.classify(&request.task, request.effort_override);
        self.enter(machine, RunState::EffortDetected)?;
        debug!(tier = %effort.tier, source = %effort.source, "effort detected");

        self.observer.on_delegation(&DelegationNotice {
            agent: profile,
            task: &request.task,
            mode,
            effort,
            timeout: self.invoker.timeouts().effective(effort.tier),
            output_dir,
        });
        self.enter(machine, RunState::Notified)?;

        let prompt = self.assembler.build(&base_prompt, request, mode);
        self.enter(machine, RunState::PromptAssembled)?;

        let invoked = self
            .invoker
            .invoke(&prompt.text, mode, &effort, output_dir)
            .await;
        self.enter(machine, RunState::Invoked)?;
        let invocation = invoked?;

        let summary = RunSummary {
            agent_id: profile.id.clone(),
            agent_name: profile.display_name.clone(),
            task: request.task.clone(),
            mode,
            effort,
            context: prompt.context,
            constraints: request.constraints.clone(),
            model: self.invoker.model().to_string(),
        };
        Ok((summary, invocation))
    }

    fn fail(
        &self,
        machine: &mut StateMachine,
        persister: &ResultPersister,
        request: &DelegationRequest,
        error: DelegateError,
    ) -> Result<RunOutcome> {
        info!(error = %error, "run failed");
        persister.save_failure(&request.agent_id, &request.task, &error.to_string())?;
        self.enter(machine, RunState::Persisted(Verdict::Failure))?;
        Ok(RunOutcome::Failure { error })
    }

    fn enter(&self, machine: &mut StateMachine, state: RunState) -> Result<()> {
        machine.advance(state)?;
        self.observer.on_state(state);
        Ok(())
    }
}
