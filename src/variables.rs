//! Placeholder extraction from prompt text.
//!
//! Two syntaxes are supported and may be mixed in the same text:
//! `${name}` / `${name:default}` and `{{name}}` (no inline default).

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A placeholder referenced in prompt text: the trimmed name plus the inline
/// default value (empty when the placeholder declares none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub default: String,
}

impl Variable {
    /// True when the placeholder declared no fallback value.
    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }
}

/// Extract the distinct variables referenced in `text`, in first-appearance
/// order. All `${...}` placeholders are scanned before any `{{...}}`
/// placeholder, and the first occurrence of a name wins — a later occurrence
/// with a different default does not produce a second entry.
///
/// Malformed placeholders (an unterminated `${`, stray braces) are not an
/// error; they simply stay literal text and yield nothing. Placeholders whose
/// name trims to nothing (`${}`, `${ : x}`) are skipped.
pub fn extract_variables(text: &str) -> Result<Vec<Variable>> {
    // The capture stops at the first '}', so nested braces never extend a match.
    let dollar_re = Regex::new(r"\$\{([^}]+)\}")?;
    let curly_re = Regex::new(r"\{\{([^}]+)\}\}")?;

    let mut variables: Vec<Variable> = Vec::new();

    for cap in dollar_re.captures_iter(text) {
        // The default runs from the first ':' to the closing brace.
        let (name, default) = match cap[1].split_once(':') {
            Some((name, default)) => (name.trim(), default.trim()),
            None => (cap[1].trim(), ""),
        };
        if name.is_empty() || variables.iter().any(|v| v.name == name) {
            continue;
        }
        variables.push(Variable {
            name: name.to_string(),
            default: default.to_string(),
        });
    }

    for cap in curly_re.captures_iter(text) {
        let name = cap[1].trim();
        if name.is_empty() || variables.iter().any(|v| v.name == name) {
            continue;
        }
        variables.push(Variable {
            name: name.to_string(),
            default: String::new(),
        });
    }

    Ok(variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, default: &str) -> Variable {
        Variable {
            name: name.to_string(),
            default: default.to_string(),
        }
    }

    #[test]
    fn test_plain_text_has_no_variables() {
        let variables = extract_variables("plain text").unwrap();
        assert!(variables.is_empty());
    }

    #[test]
    fn test_dollar_brace_with_default() {
        let variables = extract_variables("Write a ${tone:formal} email").unwrap();
        assert_eq!(variables, vec![var("tone", "formal")]);
    }

    #[test]
    fn test_dollar_brace_without_default() {
        let variables = extract_variables("Hello ${name}").unwrap();
        assert_eq!(variables, vec![var("name", "")]);
    }

    #[test]
    fn test_double_brace() {
        let variables = extract_variables("Hello {{name}}").unwrap();
        assert_eq!(variables, vec![var("name", "")]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let variables = extract_variables("${ tone : formal } and {{ name }}").unwrap();
        assert_eq!(variables, vec![var("tone", "formal"), var("name", "")]);
    }

    #[test]
    fn test_dollar_brace_takes_precedence_over_double_brace() {
        let variables = extract_variables("${x:5} and {{x}}").unwrap();
        assert_eq!(variables, vec![var("x", "5")]);
    }

    #[test]
    fn test_first_occurrence_default_wins() {
        let variables = extract_variables("${x:first} then ${x:second} then ${x}").unwrap();
        assert_eq!(variables, vec![var("x", "first")]);
    }

    #[test]
    fn test_first_appearance_order() {
        let variables = extract_variables("{{b}} before ${a} in the dollar scan").unwrap();
        // The full ${...} scan runs before the {{...}} scan.
        assert_eq!(variables, vec![var("a", ""), var("b", "")]);
    }

    #[test]
    fn test_default_keeps_later_colons() {
        let variables = extract_variables("See ${url:https://example.com} now").unwrap();
        assert_eq!(variables, vec![var("url", "https://example.com")]);
    }

    #[test]
    fn test_empty_name_is_skipped() {
        assert!(extract_variables("${}").unwrap().is_empty());
        assert!(extract_variables("${ : fallback}").unwrap().is_empty());
        assert!(extract_variables("{{ }}").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_placeholder_is_literal() {
        assert!(extract_variables("broken ${name").unwrap().is_empty());
        assert!(extract_variables("broken {{name").unwrap().is_empty());
    }

    #[test]
    fn test_empty_default_after_colon() {
        let variables = extract_variables("Hello ${name:}").unwrap();
        assert_eq!(variables, vec![var("name", "")]);
        assert!(!variables[0].has_default());
    }

    #[test]
    fn test_mixed_syntaxes_and_duplicates() {
        let text = "Dear ${name:Friend}, {{greeting}} from ${sender} and {{name}} again";
        let variables = extract_variables(text).unwrap();
        assert_eq!(
            variables,
            vec![var("name", "Friend"), var("sender", ""), var("greeting", "")]
        );
    }
}
