//! Terminal banners for delegation runs.
//!
//! Everything here goes to stderr; stdout is reserved for the result JSON.

use crate::agent::EffortSource;
use crate::workflow::{DelegationNotice, RunObserver, RunState};
use std::path::Path;
use std::time::Duration;

/// Maximum task characters shown in the notification banner.
pub const TASK_PREVIEW_CHARS: usize = 50;

const RULE: &str = "────────────────────────────────────────────────────────────────";

/// Prints the step 4 notification, and step headings when verbose.
#[derive(Debug, Clone, Copy)]
pub struct TerminalObserver {
    verbose: bool,
}

impl TerminalObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl RunObserver for TerminalObserver {
    fn on_state(&self, state: RunState) {
        if self.verbose
            && let Some(label) = state.step_label()
        {
            eprintln!("> {}", label);
        }
    }

    fn on_delegation(&self, notice: &DelegationNotice<'_>) {
        let effort_source = match notice.effort.source {
            EffortSource::Default => String::new(),
            source => format!(" ({})", source),
        };

        eprintln!();
        eprintln!("┌{}┐", RULE);
        eprintln!("│  {:<62}│", "Expert delegation");
        eprintln!("└{}┘", RULE);
        eprintln!();
        eprintln!("   Agent:   {} ({})", notice.agent.display_name, notice.agent.id);
        eprintln!("   Task:    {}", preview_task(notice.task));
        eprintln!("   Mode:    {}", notice.mode.label());
        eprintln!("   Effort:  {}{}", notice.effort.tier, effort_source);
        eprintln!("   Timeout: {}s", notice.timeout.as_secs());
        eprintln!("   Output:  {}", notice.output_dir.display());
        eprintln!();
    }
}

/// First 50 characters of the task, with `...` when truncated.
pub fn preview_task(task: &str) -> String {
    let mut chars = task.chars();
    let head: String = chars.by_ref().take(TASK_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn print_success(output_dir: &Path, elapsed: Duration) {
    eprintln!();
    eprintln!(
        "Delegation complete in {:.1}s: {}",
        elapsed.as_secs_f64(),
        output_dir.display()
    );
}

pub fn print_failure(output_dir: &Path) {
    eprintln!(
        "Error record saved to {}",
        output_dir.join(crate::persist::ERROR_FILE).display()
    );
}
