//! Run directory naming.

use super::{ERROR_FILE, RESULT_FILE};
use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Anything that is not ASCII alphanumeric, Hiragana, Katakana or a CJK
/// unified ideograph.
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{4E00}-\x{9FFF}]")
        .expect("static regex is valid")
});

/// Number of characters of the sanitized task kept in a directory name.
pub const TASK_SLUG_CHARS: usize = 20;

/// Replace unsafe characters with `-` and keep the first 20 characters.
pub fn sanitize_task(task: &str) -> String {
    UNSAFE_CHARS
        .replace_all(task, "-")
        .chars()
        .take(TASK_SLUG_CHARS)
        .collect()
}

/// `<agent>-<YYYYMMDD>-<sanitized task>`.
pub fn run_dir_name(agent_id: &str, date: NaiveDate, task: &str) -> String {
    format!(
        "{}-{}-{}",
        agent_id,
        date.format("%Y%m%d"),
        sanitize_task(task)
    )
}

/// Whether `dir` already holds the final record of an earlier run.
pub fn holds_completed_run(dir: &Path) -> bool {
    dir.join(RESULT_FILE).exists() || dir.join(ERROR_FILE).exists()
}

/// Pick the output directory for a run.
///
/// An explicit directory is used as given. A derived directory never
/// clobbers a completed run: `-2`, `-3`, ... is appended until a free name
/// is found.
pub fn resolve_output_dir(
    explicit: Option<&Path>,
    output_root: &Path,
    agent_id: &str,
    task: &str,
    date: NaiveDate,
) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    let name = run_dir_name(agent_id, date, task);
    let base = output_root.join(&name);
    if !holds_completed_run(&base) {
        return base;
    }

    (2u32..)
        .map(|n| output_root.join(format!("{}-{}", name, n)))
        .find(|candidate| !holds_completed_run(candidate))
        .unwrap_or(base)
}
