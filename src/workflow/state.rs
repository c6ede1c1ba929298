//! Run state machine.
//!
//! ```text
//! Start -> Identified -> PromptLoaded -> ModeSelected -> EffortDetected
//!       -> Notified -> PromptAssembled -> Invoked -> Persisted(_) -> End
//! ```
//!
//! Transitions only move forward. `Persisted(Failure)` may be entered from
//! any state between `Identified` and `Invoked`; `Persisted(Success)` only
//! from `Invoked`.

use crate::error::{DelegateError, Result};
use std::fmt;

/// Final verdict of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Start,
    Identified,
    PromptLoaded,
    ModeSelected,
    EffortDetected,
    Notified,
    PromptAssembled,
    Invoked,
    Persisted(Verdict),
    End,
}

impl RunState {
    fn rank(self) -> u8 {
        match self {
            RunState::Start => 0,
            RunState::Identified => 1,
            RunState::PromptLoaded => 2,
            RunState::ModeSelected => 3,
            RunState::EffortDetected => 4,
            RunState::Notified => 5,
            RunState::PromptAssembled => 6,
            RunState::Invoked => 7,
            RunState::Persisted(_) => 8,
            RunState::End => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Start => "start",
            RunState::Identified => "identified",
            RunState::PromptLoaded => "prompt-loaded",
            RunState::ModeSelected => "mode-selected",
            RunState::EffortDetected => "effort-detected",
            RunState::Notified => "notified",
            RunState::PromptAssembled => "prompt-assembled",
            RunState::Invoked => "invoked",
            RunState::Persisted(Verdict::Success) => "persisted(success)",
            RunState::Persisted(Verdict::Failure) => "persisted(failure)",
            RunState::End => "end",
        }
    }

    /// Workflow step heading shown in verbose output.
    pub fn step_label(&self) -> Option<&'static str> {
        match self {
            RunState::Identified => Some("Step 1: Expert identification"),
            RunState::PromptLoaded => Some("Step 2: Prompt loading"),
            RunState::ModeSelected => Some("Step 3: Mode selection"),
            RunState::EffortDetected => Some("Step 3.5: Reasoning effort detection"),
            RunState::Notified => Some("Step 4: User notification"),
            RunState::PromptAssembled => Some("Step 5: Prompt construction"),
            RunState::Invoked => Some("Step 6: Expert invocation"),
            RunState::Persisted(_) => Some("Step 7: Response processing"),
            RunState::Start | RunState::End => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Persisted(_) | RunState::End)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current state of one run and every state it passed through.
#[derive(Debug, Clone)]
pub struct StateMachine {
    current: RunState,
    history: Vec<RunState>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current: RunState::Start,
            history: vec![RunState::Start],
        }
    }

    pub fn current(&self) -> RunState {
        self.current
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub fn into_history(self) -> Vec<RunState> {
        self.history
    }

    /// Move to `next`, or fail with [`DelegateError::InvalidTransition`].
    pub fn advance(&mut self, next: RunState) -> Result<()> {
        let from = self.current;
        let allowed = match next {
            RunState::Persisted(Verdict::Success) => from == RunState::Invoked,
            RunState::Persisted(Verdict::Failure) => {
                from.rank() >= RunState::Identified.rank() && !from.is_terminal()
            }
            RunState::End => matches!(from, RunState::Persisted(_)),
            _ => next.rank() == from.rank() + 1,
        };

        if !allowed {
            return Err(DelegateError::InvalidTransition { from, to: next });
        }

        self.current = next;
        self.history.push(next);
        Ok(())
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
