//! Prompt construction for delegated agents.
//!
//! - **Source**: loading an agent's base prompt text
//! - **Sections**: the canonical seven-section delegation prompt
//! - **Template**: placeholder substitution for runner argument templates

mod sections;
mod source;
mod template;

pub use sections::{
    ADVISORY_MUST_DO, ADVISORY_MUST_NOT_DO, AssembledPrompt, NONE_MARKER, PromptAssembler,
    SECTION_HEADINGS,
};
pub use source::PromptLoader;
pub use template::{TemplateError, TemplateVars, check_template, render_template};
