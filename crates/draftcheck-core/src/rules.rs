//! Rule trait, rule metadata and the per-file lint context

use serde::Serialize;

use crate::diagnostics::{Diagnostic, Severity};
use crate::document::Document;
use crate::lexer::Token;
use crate::source_map::{SourceMap, Span};
use crate::walk::{Event, Interest};
use crate::Result;

/// Categories for organizing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Unbalanced environments, groups and math
    Structure,
    /// Citations, references, footnotes and markup conventions
    General,
    /// Spacing, dashes, quotes and numerals
    Typography,
    /// Wordiness and phrasing; off unless enabled
    Style,
}

impl RuleCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            RuleCategory::Structure => "structure",
            RuleCategory::General => "general",
            RuleCategory::Typography => "typography",
            RuleCategory::Style => "style",
        }
    }
}

/// Static description of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleMetadata {
    /// Stable three-digit code shown in reports
    pub code: &'static str,
    /// Kebab-case name, usable in configuration instead of the code
    pub name: &'static str,
    /// One-line description, also the default diagnostic message
    pub summary: &'static str,
    /// Long help with bad/good examples
    pub explanation: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    /// Enabled by the recommended preset
    pub recommended: bool,
    /// Render spaces visibly in the report context line
    pub show_spaces: bool,
}

/// A single style check
///
/// Rules are pure: they read the context and the filtered events and return
/// diagnostics. They must not depend on other rules.
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Events this rule wants from the walk
    fn interest(&self) -> Interest;

    fn check(&self, ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Result<Vec<Diagnostic>>;
}

/// Runs a set of rules over one file
pub trait RuleEngine: Send + Sync {
    /// Diagnostics from every active rule, sorted by location
    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic>;

    fn active_rules(&self) -> Vec<&RuleMetadata>;
}

/// Everything a rule may look at for one file
#[derive(Debug)]
pub struct LintContext<'a> {
    /// File identifier, for labelling only
    pub file: &'a str,
    pub source: &'a str,
    pub source_map: &'a SourceMap,
    pub tokens: &'a [Token<'a>],
    pub document: &'a Document<'a>,
}

impl<'a> LintContext<'a> {
    /// Span for a byte range of the source
    pub fn span(&self, start: usize, end: usize) -> Span {
        self.source_map.span(start, end, self.source)
    }

    /// Diagnostic for `metadata` over a byte range, with the summary as message
    pub fn report(&self, metadata: &RuleMetadata, start: usize, end: usize) -> Diagnostic {
        self.report_with(metadata, start, end, metadata.summary)
    }

    /// Diagnostic for `metadata` over a byte range with a custom message
    pub fn report_with(
        &self,
        metadata: &RuleMetadata,
        start: usize,
        end: usize,
        message: impl Into<String>,
    ) -> Diagnostic {
        self.report_span(metadata, self.span(start, end), message)
    }

    /// Diagnostic for `metadata` over an existing span
    pub fn report_span(
        &self,
        metadata: &RuleMetadata,
        span: Span,
        message: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic::for_rule(metadata, span, message).with_excerpt(span.text(self.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_document;
    use crate::lexer::tokenize;

    const META: RuleMetadata = RuleMetadata {
        code: "999",
        name: "test-rule",
        summary: "Test summary.",
        explanation: "",
        category: RuleCategory::Typography,
        severity: Severity::Warning,
        recommended: true,
        show_spaces: true,
    };

    #[test]
    fn test_report_computes_position_and_excerpt() {
        let source = "first\nsecond line";
        let tokens = tokenize(source);
        let output = build_document(source, &tokens);
        let map = SourceMap::new(source);
        let ctx = LintContext {
            file: "t.tex",
            source,
            source_map: &map,
            tokens: &tokens,
            document: &output.document,
        };

        let diagnostic = ctx.report(&META, 13, 17);
        assert_eq!(diagnostic.code, "999");
        assert_eq!(diagnostic.name, "test-rule");
        assert_eq!(diagnostic.message, "Test summary.");
        assert_eq!(diagnostic.span.start.line, 2);
        assert_eq!(diagnostic.span.start.column, 8);
        assert_eq!(diagnostic.excerpt.as_deref(), Some("line"));
        assert!(diagnostic.show_spaces);
    }

    #[test]
    fn test_category_slug() {
        assert_eq!(RuleCategory::Style.slug(), "style");
        assert_eq!(
            serde_json::to_string(&RuleCategory::Typography).unwrap(),
            "\"typography\""
        );
    }
}
