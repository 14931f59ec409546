//! # Template Interpreter
//!
//! Display templates are plain text with named placeholders:
//!
//! ```text
//! App {{.AppName}} is running in org {{.Org.Name}}
//! ```
//!
//! A template is parsed once into literal text and field references, then
//! rendered against a [`SubstitutionMap`]. Field references are resolved by
//! key lookup only; a dotted path walks nested maps.
//!
//! Supported action forms:
//! - `{{.Key}}` and `{{ .Key }}`
//! - `{{.Outer.Inner}}`
//! - `{{- .Key}}` trims whitespace before the action, `{{.Key -}}` after it
//!
//! Everything else inside `{{ }}` is a syntax error.

use crate::error::TemplateError;
use crate::value::{SubstitutionMap, Value};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Vec<String>),
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Compiles a template string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Syntax`] for an unterminated action or an
    /// action that is not a field reference.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            text.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or_else(|| syntax_error(source, "unclosed action"))?;
            let mut action = &after_open[..end];
            rest = &after_open[end + CLOSE.len()..];

            if let Some(trimmed) = strip_left_trim_marker(action) {
                action = trimmed;
                text.truncate(text.trim_end().len());
            }
            if let Some(trimmed) = strip_right_trim_marker(action) {
                action = trimmed;
                rest = rest.trim_start();
            }

            let path = parse_field(source, action.trim())?;
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Field(path));
        }

        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Dotted key paths referenced by the template, in order of appearance.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(path) => Some(path.join(".")),
            Segment::Text(_) => None,
        })
    }

    /// Renders the template against `data`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingKey`] when a referenced key is absent,
    /// and [`TemplateError::NotAMap`] when a dotted path steps into a value
    /// that is not a map.
    pub fn render(&self, data: &SubstitutionMap) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(path) => out.push_str(&self.lookup(path, data)?.to_string()),
            }
        }
        Ok(out)
    }

    fn lookup<'a>(
        &self,
        path: &[String],
        data: &'a SubstitutionMap,
    ) -> Result<&'a Value, TemplateError> {
        let mut map = data;
        let mut found = None;
        for (depth, key) in path.iter().enumerate() {
            if let Some(parent) = found {
                map = Value::as_map(parent).ok_or_else(|| TemplateError::NotAMap {
                    template: self.source.clone(),
                    key: path[..depth].join("."),
                })?;
            }
            found = Some(map.get(key).ok_or_else(|| TemplateError::MissingKey {
                template: self.source.clone(),
                key: path[..=depth].join("."),
            })?);
        }
        found.ok_or_else(|| syntax_error(&self.source, "empty field reference"))
    }
}

/// Compiles and renders in one step.
pub fn interpolate(source: &str, data: &SubstitutionMap) -> Result<String, TemplateError> {
    Template::parse(source)?.render(data)
}

fn strip_left_trim_marker(action: &str) -> Option<&str> {
    let rest = action.strip_prefix('-')?;
    rest.starts_with(char::is_whitespace).then_some(rest)
}

fn strip_right_trim_marker(action: &str) -> Option<&str> {
    let rest = action.strip_suffix('-')?;
    rest.ends_with(char::is_whitespace).then_some(rest)
}

fn parse_field(source: &str, action: &str) -> Result<Vec<String>, TemplateError> {
    if action.is_empty() {
        return Err(syntax_error(source, "empty action"));
    }
    let Some(path) = action.strip_prefix('.') else {
        return Err(syntax_error(
            source,
            &format!("unsupported action {{{{{}}}}}", action),
        ));
    };

    let keys: Vec<String> = path.split('.').map(str::to_string).collect();
    if keys.iter().any(|key| !is_identifier(key)) {
        return Err(syntax_error(
            source,
            &format!("bad field reference {{{{{}}}}}", action),
        ));
    }
    Ok(keys)
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn syntax_error(source: &str, reason: &str) -> TemplateError {
    TemplateError::Syntax {
        template: source.to_string(),
        reason: reason.to_string(),
    }
}
