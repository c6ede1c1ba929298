//! Run artifact persistence.
//!
//! Every run owns one output directory. It always receives the audit copy of
//! the prompt, then exactly one of:
//! - `response.md` + `result.json` on success
//! - `error.json` on failure

mod layout;
mod persister;
mod records;

pub use layout::{
    TASK_SLUG_CHARS, holds_completed_run, resolve_output_dir, run_dir_name, sanitize_task,
};
pub use persister::ResultPersister;
pub use records::{
    ErrorRecord, ResultRecord, RunSummary, WORKFLOW_TAG, format_timestamp,
    render_response_document, to_pretty_json,
};

pub const RESPONSE_FILE: &str = "response.md";
pub const RESULT_FILE: &str = "result.json";
pub const ERROR_FILE: &str = "error.json";
