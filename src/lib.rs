//! Delegator: routes a task to an expert agent profile and runs it through an
//! external reasoning agent.
//!
//! A run follows seven steps: identify the expert, load its base prompt,
//! select the mode, detect the reasoning effort, announce the delegation,
//! assemble the prompt, then invoke the agent and persist what came back.
//! Every run leaves `response.md` + `result.json` or `error.json` in its
//! output directory.

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod git;
pub mod persist;
pub mod request;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
