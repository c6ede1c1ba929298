//! Invocation of the external reasoning agent.
//!
//! - **Runner**: the injected `run(prompt, options)` capability
//! - **Command**: the production runner that spawns the agent CLI
//! - **Progress**: spinner and silent progress notifiers
//! - **Invoker**: timeout race, progress ticks, prompt file lifecycle

mod command;
mod invoker;
mod progress;
mod runner;

pub use command::CommandRunner;
pub use invoker::{AUDIT_PROMPT_FILE, Invocation, ProcessInvoker, TEMP_PROMPT_FILE, TimeoutPolicy};
pub use progress::{ProgressNotifier, SilentProgress, SpinnerProgress};
pub use runner::{AgentRunner, RunOptions, RunnerError};
