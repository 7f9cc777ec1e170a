//! Prompt templates and the registry that renders them.
//!
//! A template body names its inputs with `{placeholder}` markers. The set of
//! placeholders is derived from the body itself, so a template can never
//! declare an input it does not use (or use one it does not declare).

pub mod catalog;

pub use catalog::Operation;

use service_core::error::AppError;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Error type for template lookups and rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Template '{template}' is missing field '{field}'")]
    MissingField { template: String, field: String },

    #[error("Template '{template}' placeholders {declared:?} do not match request fields {expected:?}")]
    PlaceholderMismatch {
        template: String,
        declared: Vec<String>,
        expected: Vec<String>,
    },
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::TemplateError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A named, immutable prompt with `{placeholder}` slots.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    body: String,
    segments: Vec<Segment>,
    placeholders: BTreeSet<String>,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let segments = parse_segments(&body);
        let placeholders = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(p) => Some(p.clone()),
                Segment::Literal(_) => None,
            })
            .collect();

        Self {
            name: name.into(),
            body,
            segments,
            placeholders,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn placeholders(&self) -> &BTreeSet<String> {
        &self.placeholders
    }

    /// Substitute every placeholder with its field value, verbatim.
    ///
    /// Substitution is a single pass: braces inside a value are never
    /// interpreted as further placeholders. Fields the template does not
    /// name are ignored.
    pub fn render(&self, fields: &HashMap<&str, String>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .placeholders
            .iter()
            .find(|p| !fields.contains_key(p.as_str()))
        {
            return Err(TemplateError::MissingField {
                template: self.name.clone(),
                field: missing.clone(),
            });
        }

        let mut rendered = String::with_capacity(self.body.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(field) => rendered.push_str(&fields[field.as_str()]),
            }
        }
        Ok(rendered)
    }

    /// Check that this template's placeholders are exactly `expected`.
    pub fn ensure_placeholders(&self, expected: &[&str]) -> Result<(), TemplateError> {
        let expected_set: BTreeSet<String> = expected.iter().map(|f| f.to_string()).collect();
        if expected_set == self.placeholders {
            Ok(())
        } else {
            Err(TemplateError::PlaceholderMismatch {
                template: self.name.clone(),
                declared: self.placeholders.iter().cloned().collect(),
                expected: expected_set.into_iter().collect(),
            })
        }
    }
}

/// Read-only lookup table from operation name to template.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, PromptTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding one template for every [`Operation`].
    pub fn builtin() -> Self {
        Operation::ALL
            .iter()
            .fold(Self::new(), |registry, op| {
                registry.with_template(PromptTemplate::new(op.name(), op.template()))
            })
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.templates.insert(template.name().to_string(), template);
        self
    }

    pub fn get(&self, name: &str) -> Result<&PromptTemplate, TemplateError> {
        self.templates
            .get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate(name.to_string()))
    }

    pub fn render(
        &self,
        name: &str,
        fields: &HashMap<&str, String>,
    ) -> Result<String, TemplateError> {
        self.get(name)?.render(fields)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_segments(body: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = body;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) if is_placeholder_name(&after[..close]) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(after[..close].to_string()));
                rest = &after[close + 1..];
            }
            _ => {
                // Not a placeholder; keep the brace as text.
                literal.push('{');
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}
