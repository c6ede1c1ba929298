//! Exit code constants for the `delegate` CLI.
//!
//! - 0: Success, or an informational listing
//! - 1: Any failure (validation, configuration, invocation, persistence)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Any failed run: bad input, unknown agent, missing prompt file,
/// agent timeout or crash, or an artifact that could not be written.
pub const FAILURE: i32 = 1;
