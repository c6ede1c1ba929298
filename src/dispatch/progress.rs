//! Progress reporting while the external agent runs.

use crate::agent::EffortTier;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Receives progress events from the invoker.
///
/// `on_tick` fires once per progress interval while the agent is running,
/// and never after `on_finish`.
pub trait ProgressNotifier: Send + Sync {
    fn on_start(&self, _effort: EffortTier, _timeout: Duration) {}

    fn on_tick(&self, elapsed: Duration);

    fn on_finish(&self, _elapsed: Duration, _success: bool) {}
}

/// Terminal spinner on stderr. Hidden automatically when stderr is not a TTY.
pub struct SpinnerProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for SpinnerProgress {
    fn on_start(&self, effort: EffortTier, timeout: Duration) {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(Self::style());
        bar.set_message(format!(
            "Agent running (effort: {}, timeout: {}s)...",
            effort,
            timeout.as_secs()
        ));
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_tick(&self, elapsed: Duration) {
        if let Ok(slot) = self.bar.lock()
            && let Some(bar) = slot.as_ref()
        {
            bar.set_message(format!("Agent running... {:.1}s", elapsed.as_secs_f64()));
            bar.tick();
        }
    }

    fn on_finish(&self, elapsed: Duration, success: bool) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(bar) = slot.take()
        {
            let status = if success { "completed" } else { "stopped" };
            bar.finish_with_message(format!(
                "Agent {} in {:.1}s",
                status,
                elapsed.as_secs_f64()
            ));
        }
    }
}

/// Discards all progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressNotifier for SilentProgress {
    fn on_tick(&self, _elapsed: Duration) {}
}
