//! Preview rendering: substitute placeholders with defaults or bound values.

use std::collections::HashMap;

use anyhow::Result;
use regex::{NoExpand, Regex};

use crate::variables::extract_variables;

/// Controls how substituted values are marked up in preview output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Opening marker wrapped around emphasised values.
    pub emphasis_open: String,
    /// Closing marker wrapped around emphasised values.
    pub emphasis_close: String,
    /// HTML-escape values before wrapping them in the emphasis markers.
    /// Leave on unless the consumer renders the output as plain text.
    pub escape_values: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            emphasis_open: "<b>".to_string(),
            emphasis_close: "</b>".to_string(),
            escape_values: true,
        }
    }
}

/// Renders prompt previews by substituting every placeholder occurrence.
pub struct Renderer {
    options: RenderOptions,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render `text` with every placeholder substituted.
    ///
    /// Without bindings, each variable is replaced by its literal default, or
    /// by its emphasised name when no default exists (so the caller can flag
    /// values still to be filled in). With bindings, each variable resolves to
    /// the trimmed bound value, then the default, then the bare name, and the
    /// winner is emphasised. Text containing no placeholders comes back
    /// unchanged.
    pub fn render_preview(
        &self,
        text: &str,
        bindings: Option<&HashMap<String, String>>,
    ) -> Result<String> {
        match bindings {
            Some(map) => self.render_bound(text, map),
            None => self.render_defaults(text),
        }
    }

    fn render_defaults(&self, text: &str) -> Result<String> {
        let variables = extract_variables(text)?;
        if variables.is_empty() {
            return Ok(text.to_string());
        }

        let mut preview = text.to_string();
        for variable in &variables {
            let replacement = if variable.has_default() {
                variable.default.clone()
            } else {
                self.emphasise(&variable.name)
            };
            preview = substitute(&preview, &variable.name, &replacement)?;
        }
        Ok(preview)
    }

    fn render_bound(&self, text: &str, bindings: &HashMap<String, String>) -> Result<String> {
        let variables = extract_variables(text)?;

        let mut preview = text.to_string();
        for variable in &variables {
            let bound = bindings
                .get(&variable.name)
                .map(|value| value.trim())
                .unwrap_or("");
            let value = if !bound.is_empty() {
                bound
            } else if variable.has_default() {
                variable.default.as_str()
            } else {
                variable.name.as_str()
            };
            let replacement = self.emphasise(value);
            preview = substitute(&preview, &variable.name, &replacement)?;
        }
        Ok(preview)
    }

    fn emphasise(&self, value: &str) -> String {
        let value = if self.options.escape_values {
            escape_html(value)
        } else {
            value.to_string()
        };
        format!(
            "{}{}{}",
            self.options.emphasis_open, value, self.options.emphasis_close
        )
    }
}

/// Replace every `${name}` / `${name:default}` / `{{name}}` occurrence of one
/// variable. The name is embedded as an exact token, so `${tone}` never
/// swallows `${toneOfVoice}`, and metacharacters in the name stay literal.
fn substitute(text: &str, name: &str, replacement: &str) -> Result<String> {
    let escaped = regex::escape(name);
    let dollar_re = Regex::new(&format!(r"\$\{{\s*{escaped}\s*(?::[^}}]*)?\}}"))?;
    let curly_re = Regex::new(&format!(r"\{{\{{\s*{escaped}\s*\}}\}}"))?;

    let pass = dollar_re.replace_all(text, NoExpand(replacement));
    Ok(curly_re
        .replace_all(&pass, NoExpand(replacement))
        .into_owned())
}

/// Minimal HTML escaping for values injected into emphasis markup.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_substitution() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("Write a ${tone:formal} letter", None)
            .unwrap();
        assert_eq!(preview, "Write a formal letter");
    }

    #[test]
    fn test_no_default_shows_emphasised_name() {
        let renderer = Renderer::new();
        let preview = renderer.render_preview("Hello ${name}", None).unwrap();
        assert_eq!(preview, "Hello <b>name</b>");
    }

    #[test]
    fn test_double_brace_substitution() {
        let renderer = Renderer::new();
        let preview = renderer.render_preview("Hello {{name}}", None).unwrap();
        assert_eq!(preview, "Hello <b>name</b>");
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let renderer = Renderer::new();
        let text = "no placeholders here, just {braces} and $dollars";
        assert_eq!(renderer.render_preview(text, None).unwrap(), text);
    }

    #[test]
    fn test_all_occurrences_replaced_across_syntaxes() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("${name:Ada} wrote it. Thanks, {{name}}!", None)
            .unwrap();
        assert_eq!(preview, "Ada wrote it. Thanks, Ada!");
    }

    #[test]
    fn test_exact_name_match_leaves_longer_names_alone() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("${tone:calm} but ${toneOfVoice:stern}", None)
            .unwrap();
        assert_eq!(preview, "calm but stern");
    }

    #[test]
    fn test_bound_value_wins_over_default() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("Hi ${name:Friend}", Some(&bindings(&[("name", "Alice")])))
            .unwrap();
        assert_eq!(preview, "Hi <b>Alice</b>");
        assert!(!preview.contains("Friend"));
    }

    #[test]
    fn test_empty_bound_value_falls_back_to_default() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("Hi ${name:Friend}", Some(&bindings(&[("name", "")])))
            .unwrap();
        assert_eq!(preview, "Hi <b>Friend</b>");
    }

    #[test]
    fn test_whitespace_only_binding_falls_back_to_default() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("Hi ${name:Friend}", Some(&bindings(&[("name", "   ")])))
            .unwrap();
        assert_eq!(preview, "Hi <b>Friend</b>");
    }

    #[test]
    fn test_missing_binding_without_default_shows_name() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("Hello ${name}", Some(&bindings(&[])))
            .unwrap();
        assert_eq!(preview, "Hello <b>name</b>");
    }

    #[test]
    fn test_bound_value_is_trimmed() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("Hi ${name}", Some(&bindings(&[("name", "  Alice  ")])))
            .unwrap();
        assert_eq!(preview, "Hi <b>Alice</b>");
    }

    #[test]
    fn test_bound_markup_is_escaped() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview(
                "Hi ${name}",
                Some(&bindings(&[("name", "<script>alert(1)</script>")])),
            )
            .unwrap();
        assert_eq!(preview, "Hi <b>&lt;script&gt;alert(1)&lt;/script&gt;</b>");
    }

    #[test]
    fn test_escaping_can_be_disabled() {
        let renderer = Renderer::with_options(RenderOptions {
            escape_values: false,
            ..RenderOptions::default()
        });
        let preview = renderer
            .render_preview("Hi ${name}", Some(&bindings(&[("name", "<em>x</em>")])))
            .unwrap();
        assert_eq!(preview, "Hi <b><em>x</em></b>");
    }

    #[test]
    fn test_custom_emphasis_markers() {
        let renderer = Renderer::with_options(RenderOptions {
            emphasis_open: "**".to_string(),
            emphasis_close: "**".to_string(),
            escape_values: true,
        });
        let preview = renderer.render_preview("Hello ${name}", None).unwrap();
        assert_eq!(preview, "Hello **name**");
    }

    #[test]
    fn test_regex_metacharacters_in_name() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("total: ${a+b:42}", None)
            .unwrap();
        assert_eq!(preview, "total: 42");
    }

    #[test]
    fn test_replacement_dollar_signs_stay_literal() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("price: ${price}", Some(&bindings(&[("price", "$100")])))
            .unwrap();
        assert_eq!(preview, "price: <b>$100</b>");
    }

    #[test]
    fn test_spaced_placeholder_forms_are_replaced() {
        let renderer = Renderer::new();
        let preview = renderer
            .render_preview("${ tone : formal } and {{ tone }}", None)
            .unwrap();
        assert_eq!(preview, "formal and formal");
    }

    #[test]
    fn test_mode_b_default_is_emphasised() {
        // Mode A substitutes a default bare; Mode B marks it as filled-in.
        let renderer = Renderer::new();
        let text = "Write a ${tone:formal} letter";
        assert_eq!(
            renderer.render_preview(text, None).unwrap(),
            "Write a formal letter"
        );
        assert_eq!(
            renderer.render_preview(text, Some(&bindings(&[]))).unwrap(),
            "Write a <b>formal</b> letter"
        );
    }
}
