//! Implementation of `delegate --list-agents`.

use crate::agent::{AgentMode, AgentRegistry};
use crate::config::Config;
use crate::error::Result;
use std::path::Path;

pub fn cmd_list_agents(config_path: Option<&Path>, cwd: &Path) -> Result<()> {
    let loaded = Config::discover(config_path, cwd)?;
    print!("{}", render_agent_list(&loaded.config.registry()));
    Ok(())
}

/// One line per agent, in id order, with its description and default mode.
pub fn render_agent_list(registry: &AgentRegistry) -> String {
    let width = registry.ids().map(str::len).max().unwrap_or(0);

    let mut out = String::from("Available agents:\n\n");
    for agent in registry.iter() {
        let marker = match agent.default_mode {
            AgentMode::Advisory => ' ',
            AgentMode::Implementation => '*',
        };
        out.push_str(&format!(
            "  {} {:<width$}  {} [{}]\n",
            marker,
            agent.id,
            agent.description,
            agent.default_mode,
            width = width
        ));
    }
    out.push_str("\n  * = implementation (may change files); others are advisory only\n");
    out
}
