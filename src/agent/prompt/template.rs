//! Placeholder substitution for runner argument templates.
//!
//! Argument templates such as `reasoning.effort="{effort}"` are rendered per
//! invocation. The engine fails on undefined variables rather than
//! substituting an empty string, so a typo in `delegator.yaml` surfaces at
//! config load instead of silently producing a malformed flag.
//!
//! # Syntax
//!
//! - `{name}` substitutes the value of variable `name`
//! - `{{` renders a literal `{`
//! - `}}` renders a literal `}`

use std::collections::BTreeMap;
use thiserror::Error;

/// Template variables keyed by placeholder name.
pub type TemplateVars<'a> = BTreeMap<&'a str, String>;

/// Template rendering failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    #[error("empty variable name '{{}}' at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// A parsed template piece.
enum Piece<'t> {
    Text(char),
    Var { name: &'t str, position: usize },
}

fn parse(template: &str) -> Result<Vec<Piece<'_>>, TemplateError> {
    let mut pieces = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                pieces.push(Piece::Text('{'));
            }
            '{' => {
                let name_start = pos + 1;
                let close = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some(_) => {}
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                };
                let name = template[name_start..close].trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }
                pieces.push(Piece::Var {
                    name,
                    position: pos,
                });
            }
            '}' => {
                // `}}` collapses to one brace; a lone `}` is literal.
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                }
                pieces.push(Piece::Text('}'));
            }
            other => pieces.push(Piece::Text(other)),
        }
    }

    Ok(pieces)
}

/// Render a template by substituting `{name}` placeholders.
///
/// ```
/// use delegator::agent::prompt::{TemplateVars, render_template};
///
/// let mut vars = TemplateVars::new();
/// vars.insert("effort", "xhigh".to_string());
///
/// let arg = render_template("reasoning.effort=\"{effort}\"", &vars).unwrap();
/// assert_eq!(arg, "reasoning.effort=\"xhigh\"");
/// ```
pub fn render_template(template: &str, vars: &TemplateVars<'_>) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());

    for piece in parse(template)? {
        match piece {
            Piece::Text(ch) => rendered.push(ch),
            Piece::Var { name, position } => match vars.get(name) {
                Some(value) => rendered.push_str(value),
                None => {
                    return Err(TemplateError::UndefinedVariable {
                        name: name.to_string(),
                        position,
                    });
                }
            },
        }
    }

    Ok(rendered)
}

/// Check that a template only references `allowed` variables.
pub fn check_template(template: &str, allowed: &[&str]) -> Result<(), TemplateError> {
    for piece in parse(template)? {
        if let Piece::Var { name, position } = piece
            && !allowed.contains(&name)
        {
            return Err(TemplateError::UndefinedVariable {
                name: name.to_string(),
                position,
            });
        }
    }
    Ok(())
}
