use std::collections::HashMap;

use thiserror::Error;

/// Errors raised while filling `{{placeholder}}` markers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Template references unknown placeholder '{0}'")]
    UnknownPlaceholder(String),

    #[error("Unterminated placeholder starting at byte {0}")]
    UnterminatedPlaceholder(usize),

    #[error("Empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),
}

/// Fills every `{{name}}` marker in `template` with the matching value
///
/// Whitespace inside the braces is ignored. Every referenced name must be
/// present in `variables` (an empty string is a valid value); anything else
/// is an error, so a run never goes out with a half-rendered prompt.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use tripcrew_api::domain::crew::render_template;
///
/// let vars = HashMap::from([("destination".to_string(), "Lisbon".to_string())]);
/// let text = render_template("Trip to {{ destination }}", &vars).unwrap();
/// assert_eq!(text, "Trip to Lisbon");
/// ```
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        rendered.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or(TemplateError::UnterminatedPlaceholder(offset + start))?;

        let name = after_open[..end].trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyPlaceholder(offset + start));
        }

        let value = variables
            .get(name)
            .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;
        rendered.push_str(value);

        let consumed = start + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}

/// Lists the placeholder names referenced by a template, in order of first use
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };
        let name = after_open[..end].trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after_open[end + 2..];
    }

    names
}
