//! Canonical delegation prompt.
//!
//! The prompt is an ordered list of section builders. Each builder sees the
//! mode and decides its own extra lines, so advisory-only clauses are always
//! appended after the shared boilerplate and never replace it. Two builds
//! with the same inputs produce byte-identical text.

use crate::agent::AgentMode;
use crate::request::DelegationRequest;

/// Extra MUST DO line under advisory mode.
pub const ADVISORY_MUST_DO: &str = "- Do not modify any files (recommendations only)";

/// Extra MUST NOT DO line under advisory mode.
pub const ADVISORY_MUST_NOT_DO: &str = "- Do not directly edit files";

/// Marker used when context or constraints are absent.
pub const NONE_MARKER: &str = "(none)";

/// Section headings, in document order.
pub const SECTION_HEADINGS: [&str; 7] = [
    "TASK",
    "EXPECTED OUTCOME",
    "CONTEXT",
    "CONSTRAINTS",
    "MUST DO",
    "MUST NOT DO",
    "OUTPUT FORMAT",
];

/// A fully assembled prompt, plus the context it embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub text: String,
    pub context: Option<String>,
}

/// Everything a section builder may look at.
struct SectionInput<'a> {
    request: &'a DelegationRequest,
    mode: AgentMode,
    output_language: &'a str,
}

struct Section {
    heading: &'static str,
    lines: Vec<String>,
}

type SectionBuilder = fn(&SectionInput<'_>) -> Section;

const SECTION_BUILDERS: [SectionBuilder; 7] = [
    task_section,
    expected_outcome_section,
    context_section,
    constraints_section,
    must_do_section,
    must_not_do_section,
    output_format_section,
];

fn task_section(input: &SectionInput<'_>) -> Section {
    Section {
        heading: "TASK",
        lines: vec![input.request.task.clone()],
    }
}

fn expected_outcome_section(input: &SectionInput<'_>) -> Section {
    Section {
        heading: "EXPECTED OUTCOME",
        lines: vec![format!(
            "A domain-expert analysis and recommendation for the task, written in {}",
            input.output_language
        )],
    }
}

fn context_section(input: &SectionInput<'_>) -> Section {
    Section {
        heading: "CONTEXT",
        lines: vec![or_none(input.request.context.as_deref())],
    }
}

fn constraints_section(input: &SectionInput<'_>) -> Section {
    let permission = if input.mode.allows_file_changes() {
        "file changes allowed where needed"
    } else {
        "analysis and recommendations only, file changes forbidden"
    };
    Section {
        heading: "CONSTRAINTS",
        lines: vec![
            or_none(input.request.constraints.as_deref()),
            format!("Mode: {} ({})", input.mode, permission),
        ],
    }
}

fn must_do_section(input: &SectionInput<'_>) -> Section {
    let mut lines = vec![
        "- Analyze candidly as a domain expert, without deference".to_string(),
        "- Include concrete proposals and fixes".to_string(),
        format!("- Answer in {}", input.output_language),
    ];
    if input.mode == AgentMode::Advisory {
        lines.push(ADVISORY_MUST_DO.to_string());
    }
    Section {
        heading: "MUST DO",
        lines,
    }
}

fn must_not_do_section(input: &SectionInput<'_>) -> Section {
    let mut lines = vec![
        "- End with vague or noncommittal statements".to_string(),
        "- Point out problems without proposing how to resolve them".to_string(),
    ];
    if input.mode == AgentMode::Advisory {
        lines.push(ADVISORY_MUST_NOT_DO.to_string());
    }
    Section {
        heading: "MUST NOT DO",
        lines,
    }
}

fn output_format_section(_input: &SectionInput<'_>) -> Section {
    Section {
        heading: "OUTPUT FORMAT",
        lines: vec!["A structured answer in Markdown".to_string()],
    }
}

fn or_none(value: Option<&str>) -> String {
    value.unwrap_or(NONE_MARKER).to_string()
}

/// Builds delegation prompts in a fixed language.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    output_language: String,
}

impl PromptAssembler {
    pub fn new(output_language: impl Into<String>) -> Self {
        Self {
            output_language: output_language.into(),
        }
    }

    /// Assemble the prompt: the agent's base text, a separator, then the
    /// seven fixed sections.
    pub fn build(
        &self,
        base_prompt: &str,
        request: &DelegationRequest,
        mode: AgentMode,
    ) -> AssembledPrompt {
        let input = SectionInput {
            request,
            mode,
            output_language: &self.output_language,
        };

        let mut text = String::with_capacity(base_prompt.len() + 1024);
        text.push_str(base_prompt.trim_end());
        text.push_str("\n\n---\n");

        for builder in SECTION_BUILDERS {
            let section = builder(&input);
            text.push_str("\n## ");
            text.push_str(section.heading);
            text.push('\n');
            for line in &section.lines {
                text.push_str(line);
                text.push('\n');
            }
        }

        AssembledPrompt {
            text,
            context: request.context.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DelegationRequest {
        DelegationRequest::new("code-reviewer", "Review this function for bugs").unwrap()
    }

    fn section_body<'a>(text: &'a str, heading: &str) -> &'a str {
        let marker = format!("## {}\n", heading);
        let start = text.find(&marker).unwrap() + marker.len();
        let rest = &text[start..];
        let end = rest.find("\n## ").unwrap_or(rest.len());
        &rest[..end]
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let prompt = PromptAssembler::new("English").build(
            "You are a reviewer.",
            &request(),
            AgentMode::Advisory,
        );
        assert!(prompt.text.starts_with("You are a reviewer.\n\n---\n"));

        let mut last = 0;
        for heading in SECTION_HEADINGS {
            let at = prompt.text.find(&format!("## {}\n", heading)).unwrap();
            assert!(at > last, "{heading} out of order");
            last = at;
        }
    }

    #[test]
    fn build_is_deterministic() {
        let assembler = PromptAssembler::new("Japanese");
        let request = request()
            .with_context(Some("fn add(a: i32, b: i32) -> i32 { a - b }".to_string()))
            .with_constraints(Some("No new dependencies".to_string()));
        let first = assembler.build("base", &request, AgentMode::Implementation);
        let second = assembler.build("base", &request, AgentMode::Implementation);
        assert_eq!(first, second);
    }

    #[test]
    fn advisory_mode_adds_non_mutation_clauses() {
        let prompt =
            PromptAssembler::new("English").build("base", &request(), AgentMode::Advisory);
        assert!(section_body(&prompt.text, "MUST DO").contains(ADVISORY_MUST_DO));
        assert!(section_body(&prompt.text, "MUST NOT DO").contains(ADVISORY_MUST_NOT_DO));
    }

    #[test]
    fn implementation_mode_omits_non_mutation_clauses() {
        let prompt =
            PromptAssembler::new("English").build("base", &request(), AgentMode::Implementation);
        assert!(!prompt.text.contains(ADVISORY_MUST_DO));
        assert!(!prompt.text.contains(ADVISORY_MUST_NOT_DO));
    }

    #[test]
    fn modes_differ_only_by_conditional_lines() {
        let assembler = PromptAssembler::new("English");
        let advisory = assembler.build("base", &request(), AgentMode::Advisory).text;
        let implementation = assembler
            .build("base", &request(), AgentMode::Implementation)
            .text;

        let strip = |text: &str| -> Vec<String> {
            text.lines()
                .filter(|line| *line != ADVISORY_MUST_DO && *line != ADVISORY_MUST_NOT_DO)
                .filter(|line| !line.starts_with("Mode: "))
                .map(String::from)
                .collect()
        };
        assert_eq!(strip(&advisory), strip(&implementation));
    }

    #[test]
    fn absent_context_and_constraints_use_none_marker() {
        let prompt =
            PromptAssembler::new("English").build("base", &request(), AgentMode::Advisory);
        assert_eq!(section_body(&prompt.text, "CONTEXT"), "(none)\n");
        assert_eq!(
            section_body(&prompt.text, "CONSTRAINTS"),
            "(none)\nMode: advisory (analysis and recommendations only, file changes forbidden)\n"
        );
        assert_eq!(prompt.context, None);
    }

    #[test]
    fn literal_context_is_embedded_and_returned() {
        let context = "line one\nline two".to_string();
        let request = request().with_context(Some(context.clone()));
        let prompt = PromptAssembler::new("English").build("base", &request, AgentMode::Advisory);
        assert_eq!(section_body(&prompt.text, "CONTEXT"), "line one\nline two\n");
        assert_eq!(prompt.context, Some(context));
    }

    #[test]
    fn output_language_is_configurable() {
        let prompt =
            PromptAssembler::new("Japanese").build("base", &request(), AgentMode::Advisory);
        assert!(section_body(&prompt.text, "EXPECTED OUTCOME").contains("written in Japanese"));
        assert!(section_body(&prompt.text, "MUST DO").contains("- Answer in Japanese"));
    }

    #[test]
    fn prompt_contains_no_timestamp() {
        let prompt =
            PromptAssembler::new("English").build("base", &request(), AgentMode::Advisory);
        let year = chrono::Utc::now().format("%Y").to_string();
        assert!(!prompt.text.contains(&year));
    }
}
