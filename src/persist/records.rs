//! On-disk run records.

use crate::agent::{AgentMode, EffortDecision, EffortSource, EffortTier};
use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Value of the `workflow` field in every record.
pub const WORKFLOW_TAG: &str = "7-step-delegation";

/// What a run was asked to do and how it was configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub agent_id: String,
    pub agent_name: String,
    pub task: String,
    pub mode: AgentMode,
    pub effort: EffortDecision,
    pub context: Option<String>,
    pub constraints: Option<String>,
    pub model: String,
}

/// `result.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub workflow: String,
    pub agent: String,
    pub agent_name: String,
    pub task: String,
    pub mode: AgentMode,
    pub reasoning_effort: EffortTier,
    pub reasoning_effort_source: EffortSource,
    pub context: Option<String>,
    pub constraints: Option<String>,
    pub response: String,
    pub output_dir: PathBuf,
    pub model: String,
    pub timestamp: String,
    pub elapsed_ms: u64,
}

impl ResultRecord {
    pub fn new(
        summary: &RunSummary,
        response: &str,
        output_dir: &Path,
        elapsed: Duration,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            workflow: WORKFLOW_TAG.to_string(),
            agent: summary.agent_id.clone(),
            agent_name: summary.agent_name.clone(),
            task: summary.task.clone(),
            mode: summary.mode,
            reasoning_effort: summary.effort.tier,
            reasoning_effort_source: summary.effort.source,
            context: summary.context.clone(),
            constraints: summary.constraints.clone(),
            response: response.to_string(),
            output_dir: output_dir.to_path_buf(),
            model: summary.model.clone(),
            timestamp: format_timestamp(at),
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// `error.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub workflow: String,
    pub agent: String,
    pub task: String,
    pub error: String,
    pub timestamp: String,
}

impl ErrorRecord {
    pub fn new(agent_id: &str, task: &str, error: &str, at: DateTime<Utc>) -> Self {
        Self {
            workflow: WORKFLOW_TAG.to_string(),
            agent: agent_id.to_string(),
            task: task.to_string(),
            error: error.to_string(),
            timestamp: format_timestamp(at),
        }
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2025-03-09T12:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn to_pretty_json<T: Serialize>(record: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// The human-readable `response.md` for a successful run.
pub fn render_response_document(record: &ResultRecord) -> String {
    format!(
        "# {agent_name} Response\n\
         \n\
         ## Task\n\
         {task}\n\
         \n\
         ## Mode\n\
         {mode}\n\
         \n\
         ## Reasoning Effort\n\
         {tier} ({source})\n\
         \n\
         ---\n\
         \n\
         {response}\n\
         \n\
         ---\n\
         *Generated: {timestamp}*\n\
         *Model: {model}*\n\
         *Agent: {agent_name}*\n\
         *Reasoning effort: {tier}*\n",
        agent_name = record.agent_name,
        task = record.task,
        mode = record.mode.label(),
        tier = record.reasoning_effort,
        source = record.reasoning_effort_source,
        response = record.response.trim_end(),
        timestamp = record.timestamp,
        model = record.model,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 9, 12, 30, 0).unwrap()
    }

    fn summary() -> RunSummary {
        RunSummary {
            agent_id: "code-reviewer".to_string(),
            agent_name: "Code Reviewer".to_string(),
            task: "Review this function for bugs".to_string(),
            mode: AgentMode::Advisory,
            effort: EffortDecision {
                tier: EffortTier::High,
                source: EffortSource::AutoDetected,
            },
            context: None,
            constraints: Some("No new dependencies".to_string()),
            model: "gpt-5.2-codex".to_string(),
        }
    }

    #[test]
    fn result_record_uses_camel_case_fields_and_nulls() {
        let record = ResultRecord::new(
            &summary(),
            "Found one bug.",
            Path::new("/out/run"),
            Duration::from_millis(1234),
            at(),
        );
        let value: serde_json::Value =
            serde_json::from_str(&to_pretty_json(&record).unwrap()).unwrap();

        assert_eq!(value["workflow"], "7-step-delegation");
        assert_eq!(value["agent"], "code-reviewer");
        assert_eq!(value["agentName"], "Code Reviewer");
        assert_eq!(value["mode"], "advisory");
        assert_eq!(value["reasoningEffort"], "high");
        assert_eq!(value["reasoningEffortSource"], "auto-detected");
        assert!(value["context"].is_null());
        assert_eq!(value["constraints"], "No new dependencies");
        assert_eq!(value["response"], "Found one bug.");
        assert_eq!(value["outputDir"], "/out/run");
        assert_eq!(value["model"], "gpt-5.2-codex");
        assert_eq!(value["timestamp"], "2025-03-09T12:30:00.000Z");
        assert_eq!(value["elapsedMs"], 1234);
    }

    #[test]
    fn error_record_fields() {
        let record = ErrorRecord::new("architect", "Design", "agent timed out", at());
        let value: serde_json::Value =
            serde_json::from_str(&to_pretty_json(&record).unwrap()).unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(value["workflow"], "7-step-delegation");
        assert_eq!(value["agent"], "architect");
        assert_eq!(value["task"], "Design");
        assert_eq!(value["error"], "agent timed out");
        assert_eq!(value["timestamp"], "2025-03-09T12:30:00.000Z");
    }

    #[test]
    fn response_document_layout() {
        let record = ResultRecord::new(
            &summary(),
            "Found one bug.\n",
            Path::new("/out/run"),
            Duration::from_secs(3),
            at(),
        );
        let doc = render_response_document(&record);

        assert!(doc.starts_with("# Code Reviewer Response\n\n## Task\nReview this function for bugs\n"));
        assert!(doc.contains("## Mode\nAdvisory (analysis and recommendations only)\n"));
        assert!(doc.contains("## Reasoning Effort\nhigh (auto-detected)\n"));
        assert!(doc.contains("---\n\nFound one bug.\n\n---\n"));
        assert!(doc.ends_with(
            "*Generated: 2025-03-09T12:30:00.000Z*\n\
             *Model: gpt-5.2-codex*\n\
             *Agent: Code Reviewer*\n\
             *Reasoning effort: high*\n"
        ));
    }
}
