//! Diagnostic types for LaTeX linting

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rules::RuleMetadata;
use crate::source_map::Span;

/// One reported style or structural issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable rule code, e.g. `"004"`
    pub code: String,
    /// Rule name, e.g. `"citation-spacing"`
    pub name: String,
    pub severity: Severity,
    pub message: String,
    /// Primary location to underline
    pub span: Span,
    /// Matched source text
    pub excerpt: Option<String>,
    /// Render spaces in the context line visibly
    #[serde(default, skip_serializing)]
    pub show_spaces: bool,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            severity,
            message: message.into(),
            span,
            excerpt: None,
            show_spaces: false,
        }
    }

    /// Create a diagnostic carrying a rule's code, name and default severity
    pub fn for_rule(metadata: &RuleMetadata, span: Span, message: impl Into<String>) -> Self {
        Self {
            code: metadata.code.to_string(),
            name: metadata.name.to_string(),
            severity: metadata.severity,
            message: message.into(),
            span,
            excerpt: None,
            show_spaces: metadata.show_spaces,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach the matched text
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_show_spaces(mut self, show_spaces: bool) -> Self {
        self.show_spaces = show_spaces;
        self
    }

    /// Line of the span start (1-based)
    pub fn line(&self) -> usize {
        self.span.start.line
    }

    /// Column of the span start (1-based)
    pub fn column(&self) -> usize {
        self.span.start.column
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.span.start, self.code, self.message)
    }
}

/// All diagnostics for one linted file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File identifier used for labelling only
    pub file: String,
    /// Source text, kept for rendering context lines
    #[serde(skip)]
    pub source: String,
    /// Diagnostics sorted by location
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn new(file: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics at `severity`
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Stable sort by span start (line, then column)
///
/// Ties keep their existing relative order.
pub fn sort_by_location(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.span.start.line, d.span.start.column));
}
