//! Agent catalog, effort classification, and prompt construction.
//!
//! - **Registry**: the expert profiles that can be delegated to
//! - **Mode**: advisory vs. implementation
//! - **Effort**: reasoning-effort tier detection from task text
//! - **Prompt**: base prompt loading and canonical prompt assembly
//!
//! Agents are selected by explicit id. Everything here is read-only
//! configuration built once at startup and passed to the workflow.

mod effort;
mod mode;
pub mod prompt;
mod registry;

pub use effort::{EffortDecision, EffortPolicy, EffortSource, EffortTier};
pub use mode::AgentMode;
pub use registry::{AgentProfile, AgentRegistry, PromptSource};
