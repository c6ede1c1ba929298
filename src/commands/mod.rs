//! Command implementations for `delegate`.
//!
//! The CLI has two entry points: listing agents, and running a delegation.

mod delegate;
mod display;
mod list;

use crate::cli::Cli;
use crate::error::{DelegateError, Result};

/// Route parsed arguments to the matching command.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        DelegateError::Validation(format!("failed to read current directory: {}", e))
    })?;

    if cli.list_agents {
        return list::cmd_list_agents(cli.config.as_deref(), &cwd);
    }
    delegate::cmd_delegate(&cli, &cwd).await
}
