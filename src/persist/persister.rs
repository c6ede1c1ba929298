//! Writes the final artifacts of a run.

use super::records::{
    ErrorRecord, ResultRecord, RunSummary, render_response_document, to_pretty_json,
};
use super::{ERROR_FILE, RESPONSE_FILE, RESULT_FILE};
use crate::error::{DelegateError, Result};
use crate::fs::{atomic_write_file, remove_if_exists};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Owns the output directory of one run.
///
/// After a save the directory holds either `response.md` + `result.json` or
/// `error.json`, never both: each save removes stale artifacts of the other
/// kind left by an earlier run in the same directory.
#[derive(Debug, Clone)]
pub struct ResultPersister {
    output_dir: PathBuf,
}

impl ResultPersister {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it does not exist.
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| DelegateError::persistence(&self.output_dir, e))
    }

    /// Write `response.md` and `result.json`.
    ///
    /// If `result.json` cannot be written, `response.md` is removed again so
    /// the caller can fall back to the failure record.
    pub fn save_success(
        &self,
        summary: &RunSummary,
        response: &str,
        elapsed: Duration,
    ) -> Result<ResultRecord> {
        let record = ResultRecord::new(summary, response, &self.output_dir, elapsed, Utc::now());
        let json = to_pretty_json(&record)?;

        remove_if_exists(self.output_dir.join(ERROR_FILE))?;

        let response_path = self.output_dir.join(RESPONSE_FILE);
        atomic_write_file(&response_path, &render_response_document(&record))?;

        if let Err(e) = atomic_write_file(self.output_dir.join(RESULT_FILE), &json) {
            if let Err(cleanup) = remove_if_exists(&response_path) {
                warn!(error = %cleanup, "failed to roll back response.md");
            }
            return Err(e);
        }

        debug!(dir = %self.output_dir.display(), "saved success artifacts");
        Ok(record)
    }

    /// Write `error.json`, removing any success artifacts.
    pub fn save_failure(&self, agent_id: &str, task: &str, error: &str) -> Result<ErrorRecord> {
        for stale in [RESPONSE_FILE, RESULT_FILE] {
            remove_if_exists(self.output_dir.join(stale))?;
        }

        let record = ErrorRecord::new(agent_id, task, error, Utc::now());
        atomic_write_file(self.output_dir.join(ERROR_FILE), &to_pretty_json(&record)?)?;

        debug!(dir = %self.output_dir.display(), "saved error record");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentMode, EffortDecision, EffortSource, EffortTier};
    use tempfile::TempDir;

    fn summary() -> RunSummary {
        RunSummary {
            agent_id: "security-analyst".to_string(),
            agent_name: "Security Analyst".to_string(),
            task: "Audit the login flow".to_string(),
            mode: AgentMode::Advisory,
            effort: EffortDecision {
                tier: EffortTier::Medium,
                source: EffortSource::Default,
            },
            context: Some("uses JWT".to_string()),
            constraints: None,
            model: "gpt-5.2-codex".to_string(),
        }
    }

    fn persister(temp_dir: &TempDir) -> ResultPersister {
        let persister = ResultPersister::new(temp_dir.path().join("run"));
        persister.prepare().unwrap();
        persister
    }

    #[test]
    fn prepare_is_create_if_absent() {
        let temp_dir = TempDir::new().unwrap();
        let persister = persister(&temp_dir);
        std::fs::write(persister.output_dir().join("keep.txt"), "x").unwrap();

        persister.prepare().unwrap();
        assert!(persister.output_dir().join("keep.txt").exists());
    }

    #[test]
    fn success_writes_response_and_result() {
        let temp_dir = TempDir::new().unwrap();
        let persister = persister(&temp_dir);

        let record = persister
            .save_success(&summary(), "No issues.", Duration::from_millis(42))
            .unwrap();

        let dir = persister.output_dir();
        assert!(dir.join(RESPONSE_FILE).is_file());
        assert!(!dir.join(ERROR_FILE).exists());

        let on_disk: ResultRecord =
            serde_json::from_str(&std::fs::read_to_string(dir.join(RESULT_FILE)).unwrap())
                .unwrap();
        assert_eq!(on_disk, record);
        assert_eq!(on_disk.elapsed_ms, 42);
        assert_eq!(on_disk.output_dir, dir);
        assert_eq!(on_disk.context.as_deref(), Some("uses JWT"));
    }

    #[test]
    fn failure_writes_only_error_record() {
        let temp_dir = TempDir::new().unwrap();
        let persister = persister(&temp_dir);

        persister
            .save_failure(
                "security-analyst",
                "Audit the login flow",
                "agent timed out after 600s",
            )
            .unwrap();

        let dir = persister.output_dir();
        let on_disk: ErrorRecord =
            serde_json::from_str(&std::fs::read_to_string(dir.join(ERROR_FILE)).unwrap()).unwrap();
        assert_eq!(on_disk.error, "agent timed out after 600s");
        assert_eq!(on_disk.workflow, "7-step-delegation");
        assert!(!dir.join(RESPONSE_FILE).exists());
        assert!(!dir.join(RESULT_FILE).exists());
    }

    #[test]
    fn success_replaces_stale_error_record() {
        let temp_dir = TempDir::new().unwrap();
        let persister = persister(&temp_dir);
        persister.save_failure("a", "t", "old failure").unwrap();

        persister
            .save_success(&summary(), "ok", Duration::from_secs(1))
            .unwrap();

        let dir = persister.output_dir();
        assert!(dir.join(RESULT_FILE).exists());
        assert!(!dir.join(ERROR_FILE).exists());
    }

    #[test]
    fn failure_replaces_stale_success_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let persister = persister(&temp_dir);
        persister
            .save_success(&summary(), "ok", Duration::from_secs(1))
            .unwrap();

        persister.save_failure("a", "t", "new failure").unwrap();

        let dir = persister.output_dir();
        assert!(dir.join(ERROR_FILE).exists());
        assert!(!dir.join(RESULT_FILE).exists());
        assert!(!dir.join(RESPONSE_FILE).exists());
    }

    #[test]
    fn failed_result_write_rolls_back_response() {
        let temp_dir = TempDir::new().unwrap();
        let persister = persister(&temp_dir);
        // A non-empty directory named result.json cannot be replaced by a file.
        let blocker = persister.output_dir().join(RESULT_FILE);
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("x"), "x").unwrap();

        let err = persister
            .save_success(&summary(), "ok", Duration::from_secs(1))
            .unwrap_err();

        assert!(matches!(err, DelegateError::Persistence { .. }));
        assert!(!persister.output_dir().join(RESPONSE_FILE).exists());
    }
}
