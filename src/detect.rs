//! Detection of placeholder-like text written in unsupported syntaxes.
//!
//! Prompt authors arrive with `[[name]]`, `[NAME]`, `<NAME>`, `%NAME%` and
//! similar conventions from other tools. This module finds those patterns so
//! they can be reported or rewritten into the supported `${name}` /
//! `${name:default}` form. Spans already written in a supported syntax are
//! left alone.

use std::collections::HashSet;
use std::fmt;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// The unsupported syntax a detection was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    DoubleBracket,
    DoubleCurly,
    SingleBracket,
    SingleCurly,
    AngleBracket,
    Percent,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            PatternKind::DoubleBracket => "[[...]]",
            PatternKind::DoubleCurly => "{{...}}",
            PatternKind::SingleBracket => "[...]",
            PatternKind::SingleCurly => "{...}",
            PatternKind::AngleBracket => "<...>",
            PatternKind::Percent => "%...%",
        };
        write!(f, "{}", description)
    }
}

/// One placeholder-like pattern found in the source text.
/// `start`/`end` are byte offsets of the whole match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedVariable {
    pub original: String,
    pub name: String,
    pub default: Option<String>,
    pub kind: PatternKind,
    pub start: usize,
    pub end: usize,
}

impl DetectedVariable {
    /// The supported-syntax rewrite for this detection. The name is
    /// normalised to lowercase with underscores for word breaks.
    pub fn to_supported_format(&self) -> String {
        let name = normalise_name(&self.name);
        match self.default.as_deref() {
            Some(default) if !default.is_empty() => format!("${{{}:{}}}", name, default),
            _ => format!("${{{}}}", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Names shorter than this are assumed not to be placeholders.
    pub min_name_length: usize,
    /// Extra words to suppress, on top of the built-in list.
    pub ignore: Vec<String>,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            min_name_length: 2,
            ignore: Vec::new(),
        }
    }
}

/// Finds unsupported placeholder patterns and rewrites them.
pub struct Detector {
    options: DetectOptions,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    pub fn new() -> Self {
        Self {
            options: DetectOptions::default(),
        }
    }

    pub fn with_options(options: DetectOptions) -> Self {
        Self { options }
    }

    /// Detect placeholder-like patterns that are not in a supported syntax,
    /// sorted by position. More specific patterns scan first, and a span
    /// claimed by one pattern (or by a supported placeholder) is never
    /// reported again by a later one.
    pub fn detect(&self, text: &str) -> Result<Vec<DetectedVariable>> {
        let mut detected: Vec<DetectedVariable> = Vec::new();
        let mut seen_ranges: Vec<(usize, usize)> = Vec::new();

        // Supported spans are off limits: every ${...} placeholder, and
        // {{name}} without a default (the extractor reads that form as-is;
        // {{name: default}} it would not, so that stays detectable).
        let dollar_re = Regex::new(r"\$\{[^}]+\}")?;
        for m in dollar_re.find_iter(text) {
            seen_ranges.push((m.start(), m.end()));
        }
        let plain_curly_re = Regex::new(r"\{\{([^}]+)\}\}")?;
        for cap in plain_curly_re.captures_iter(text) {
            if cap[1].contains(':') {
                continue;
            }
            if let Some(m) = cap.get(0) {
                seen_ranges.push((m.start(), m.end()));
            }
        }

        for pattern in detect_patterns()? {
            for cap in pattern.regex.captures_iter(text) {
                let whole = match cap.get(0) {
                    Some(m) => m,
                    None => continue,
                };
                let (start, end) = (whole.start(), whole.end());

                let overlaps = seen_ranges
                    .iter()
                    .any(|&(s, e)| (start >= s && start < e) || (end > s && end <= e));
                if overlaps {
                    continue;
                }

                let name = match cap.get(1) {
                    Some(m) => m.as_str().trim(),
                    None => continue,
                };
                if name.chars().count() < self.options.min_name_length {
                    continue;
                }
                if self.is_ignored(name) {
                    continue;
                }

                // Lowercase single words in angle brackets look like HTML tags.
                if pattern.kind == PatternKind::AngleBracket && !looks_like_placeholder(name) {
                    continue;
                }

                // Single bracket/curly inside a JSON string is usually data,
                // not a placeholder, unless it clearly reads as one.
                if matches!(
                    pattern.kind,
                    PatternKind::SingleBracket | PatternKind::SingleCurly
                ) && is_inside_json_string(text, start)
                    && !looks_like_placeholder(name)
                {
                    continue;
                }

                let default = if pattern.has_default {
                    cap.get(2)
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|d| !d.is_empty())
                } else {
                    None
                };

                detected.push(DetectedVariable {
                    original: whole.as_str().to_string(),
                    name: name.to_string(),
                    default,
                    kind: pattern.kind,
                    start,
                    end,
                });
                seen_ranges.push((start, end));
            }
        }

        detected.sort_by_key(|d| d.start);
        detected.dedup_by(|a, b| a.original == b.original && a.start == b.start);
        debug!("detected {} unsupported placeholder pattern(s)", detected.len());
        Ok(detected)
    }

    /// Rewrite every detection into the supported syntax. Text with nothing
    /// to convert comes back unchanged.
    pub fn convert_all(&self, text: &str) -> Result<String> {
        let mut detections = self.detect(text)?;
        if detections.is_empty() {
            return Ok(text.to_string());
        }

        // Rewrite right-to-left so earlier byte spans stay valid.
        detections.sort_by(|a, b| b.start.cmp(&a.start));
        let mut result = text.to_string();
        for detection in &detections {
            result.replace_range(
                detection.start..detection.end,
                &detection.to_supported_format(),
            );
        }
        Ok(result)
    }

    fn is_ignored(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        FALSE_POSITIVES.contains(lowered.as_str())
            || self
                .options
                .ignore
                .iter()
                .any(|word| word.eq_ignore_ascii_case(name))
    }
}

struct DetectPattern {
    kind: PatternKind,
    regex: Regex,
    has_default: bool,
}

/// Detection patterns, most specific first.
fn detect_patterns() -> Result<Vec<DetectPattern>> {
    Ok(vec![
        // [[name]], [[ name ]], [[name: default]]
        DetectPattern {
            kind: PatternKind::DoubleBracket,
            regex: Regex::new(r"\[\[\s*([a-zA-Z_][a-zA-Z0-9_\s]*?)(?:\s*:\s*([^\]]*?))?\s*\]\]")?,
            has_default: true,
        },
        // {{name: default}} — bare {{name}} is a supported span
        DetectPattern {
            kind: PatternKind::DoubleCurly,
            regex: Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_\s]*?)(?:\s*:\s*([^}]*?))?\s*\}\}")?,
            has_default: true,
        },
        // [NAME], [USER_ID], [Your Name]
        DetectPattern {
            kind: PatternKind::SingleBracket,
            regex: Regex::new(
                r"\[([A-Z][A-Z0-9_\s]*|[A-Za-z][a-zA-Z0-9_]*(?:\s+[A-Za-z][a-zA-Z0-9_]*)*)\]",
            )?,
            has_default: false,
        },
        // {NAME}, {Your Name}
        DetectPattern {
            kind: PatternKind::SingleCurly,
            regex: Regex::new(
                r"\{([A-Z][A-Z0-9_\s]*|[A-Za-z][a-zA-Z0-9_]*(?:\s+[A-Za-z][a-zA-Z0-9_]*)*)\}",
            )?,
            has_default: false,
        },
        // <NAME>, <Your Name>
        DetectPattern {
            kind: PatternKind::AngleBracket,
            regex: Regex::new(r"<([A-Z][A-Z0-9_\s]*|[a-zA-Z_][a-zA-Z0-9_\s]*)>")?,
            has_default: false,
        },
        // %NAME%
        DetectPattern {
            kind: PatternKind::Percent,
            regex: Regex::new(r"%([a-zA-Z_][a-zA-Z0-9_]*)%")?,
            has_default: false,
        },
    ])
}

/// Uppercase start or an inner space both read as deliberate placeholders
/// ("[NAME]", "<Your Name>") rather than markup or data.
fn looks_like_placeholder(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) || name.contains(' ')
}

/// Whether `index` falls inside a double-quoted string, judged by counting
/// unescaped quotes before it. Good enough to tell JSON payload text apart
/// from prose.
fn is_inside_json_string(text: &str, index: usize) -> bool {
    let bytes = text.as_bytes();
    let mut in_string = false;
    for i in 0..index.min(bytes.len()) {
        if bytes[i] == b'"' && (i == 0 || bytes[i - 1] != b'\\') {
            in_string = !in_string;
        }
    }
    in_string
}

fn normalise_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Words that show up inside brackets/braces without being placeholders:
/// HTML tags, programming keywords, and JSON-ish structural keys.
static FALSE_POSITIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        // HTML/XML common tags
        "div", "span", "p", "a", "br", "hr", "img", "input", "button", "h1", "h2", "h3", "h4",
        "h5", "h6", "ul", "ol", "li", "table", "tr", "td", "th", "thead", "tbody", "form",
        "label", "select", "option", "textarea", "script", "style", "link", "meta", "head",
        "body", "html", "section", "article", "nav", "header", "footer", "main", "aside",
        "figure", "figcaption", "strong", "em", "code", "pre", "blockquote", "cite", "abbr",
        "address", "b", "i", "u",
        // Common programming constructs
        "if", "else", "for", "while", "switch", "case", "break", "return", "function", "class",
        "const", "let", "var", "import", "export", "default", "try", "catch", "finally",
        "throw", "new", "this", "null", "undefined", "true", "false", "typeof", "instanceof",
        // JSON structure keywords
        "type", "id", "key", "value", "data", "items", "properties",
    ])
});
