//! `delegator.yaml`: model, timeouts, runner argv templates, effort triggers
//! and agent overlays.
//!
//! Every key is optional and unknown keys are ignored. Values are checked by
//! [`Config::validate`] before a run starts.

mod model;
mod operations;
pub mod types;


pub use model::Config;
pub use operations::{ConfigSource, LoadedConfig};
pub use types::{AgentDefinition, CONFIG_ENV_VAR, CONFIG_FILE_NAME, RunnerConfig};
