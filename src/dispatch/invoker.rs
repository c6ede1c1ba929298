//! Timed invocation of the external agent.
//!
//! One invocation writes the prompt files, then races three things in a
//! single `select!` loop: the runner future, the deadline, and the progress
//! ticker. Leaving the loop on any path drops the runner future and both
//! timers. The temporary prompt file is owned by a drop guard, so it is
//! removed on success, failure, timeout and panic alike.

use super::progress::ProgressNotifier;
use super::runner::{AgentRunner, RunOptions};
use crate::agent::{AgentMode, EffortDecision, EffortTier};
use crate::error::{DelegateError, Result};
use crate::fs::{atomic_write_file, write_durable};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Prompt file present only while the agent runs.
pub const TEMP_PROMPT_FILE: &str = ".delegation-prompt-temp.md";

/// Durable copy of the exact prompt sent to the agent.
pub const AUDIT_PROMPT_FILE: &str = "delegation-prompt.md";

/// Time budget per effort tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    standard: Duration,
    xhigh_multiplier: u32,
}

impl TimeoutPolicy {
    pub fn new(standard: Duration, xhigh_multiplier: u32) -> Self {
        Self {
            standard,
            xhigh_multiplier,
        }
    }

    /// `xhigh` gets the standard budget times the multiplier; every other
    /// tier gets the standard budget.
    pub fn effective(&self, tier: EffortTier) -> Duration {
        match tier {
            EffortTier::Xhigh => self.standard.saturating_mul(self.xhigh_multiplier),
            _ => self.standard,
        }
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(600), 3)
    }
}

/// A successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub response: String,
    pub elapsed: Duration,
}

/// Removes the temporary prompt file when dropped.
struct TempPromptFile {
    path: PathBuf,
}

impl TempPromptFile {
    fn create(dir: &Path, prompt: &str) -> Result<Self> {
        Self::create_with(dir, |path| write_durable(path, prompt))
    }

    /// The guard exists before `write` runs, so a partial write is removed too.
    fn create_with(dir: &Path, write: impl FnOnce(&Path) -> Result<()>) -> Result<Self> {
        let guard = Self {
            path: dir.join(TEMP_PROMPT_FILE),
        };
        write(&guard.path)?;
        Ok(guard)
    }
}

impl Drop for TempPromptFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "failed to remove temporary prompt");
        }
    }
}

/// Runs the agent once under a timeout while reporting progress.
pub struct ProcessInvoker {
    runner: Arc<dyn AgentRunner>,
    progress: Arc<dyn ProgressNotifier>,
    timeouts: TimeoutPolicy,
    tick_interval: Duration,
    model: String,
    working_dir: PathBuf,
}

impl ProcessInvoker {
    pub fn new(
        runner: Arc<dyn AgentRunner>,
        progress: Arc<dyn ProgressNotifier>,
        timeouts: TimeoutPolicy,
        tick_interval: Duration,
        model: impl Into<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            progress,
            timeouts,
            tick_interval,
            model: model.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeouts(&self) -> TimeoutPolicy {
        self.timeouts
    }

    /// Invoke the agent with `prompt`, writing the prompt files into
    /// `output_dir` first.
    ///
    /// Fails with [`DelegateError::Timeout`] when the budget for the effort
    /// tier runs out, and with [`DelegateError::Process`] when the runner
    /// fails. Both carry the elapsed time. Nothing is retried.
    pub async fn invoke(
        &self,
        prompt: &str,
        mode: AgentMode,
        effort: &EffortDecision,
        output_dir: &Path,
    ) -> Result<Invocation> {
        atomic_write_file(output_dir.join(AUDIT_PROMPT_FILE), prompt)?;
        let temp_prompt = TempPromptFile::create(output_dir, prompt)?;

        let timeout = self.timeouts.effective(effort.tier);
        let options = RunOptions {
            mode,
            effort: effort.tier,
            model: self.model.clone(),
            working_dir: self.working_dir.clone(),
        };

        info!(
            mode = %mode,
            effort = %effort.tier,
            timeout_secs = timeout.as_secs(),
            "invoking agent"
        );
        self.progress.on_start(effort.tier, timeout);

        let start = Instant::now();
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);
        let mut ticker = tokio::time::interval_at(start + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut run = self.runner.run(prompt, &options);
        let finished = loop {
            tokio::select! {
                biased;
                result = &mut run => break Some(result),
                _ = &mut deadline => break None,
                _ = ticker.tick() => self.progress.on_tick(start.elapsed()),
            }
        };
        // Dropping the runner future cancels it; the production runner kills
        // its child process on drop.
        drop(run);

        let elapsed = start.elapsed();
        self.progress.on_finish(elapsed, matches!(finished, Some(Ok(_))));
        drop(temp_prompt);

        match finished {
            Some(Ok(response)) => {
                debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    bytes = response.len(),
                    "agent finished"
                );
                Ok(Invocation { response, elapsed })
            }
            Some(Err(e)) => {
                warn!(error = %e, "agent failed");
                Err(DelegateError::Process {
                    message: e.to_string(),
                    elapsed,
                })
            }
            None => {
                warn!(timeout_secs = timeout.as_secs(), "agent timed out");
                Err(DelegateError::Timeout { timeout, elapsed })
            }
        }
    }
}
