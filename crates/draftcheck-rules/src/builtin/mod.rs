//! Built-in rule catalogue
//!
//! Each module groups related checks. A check is a plain function from the
//! lint context and its filtered walk events to diagnostics; [`BuiltinRule`]
//! pairs it with its metadata and declared interest.

use std::sync::Arc;

use draftcheck_core::{
    Command, Diagnostic, Event, EventKind, Interest, LintContext, Result, Rule, RuleMetadata,
    TextRun, Visit,
};
use regex::Regex;

pub mod citations;
pub mod commands;
pub mod environments;
pub mod footnotes;
pub mod math;
pub mod numerals;
pub mod quotes;
pub mod references;
pub mod style;
pub mod typography;
pub mod urls;
pub mod wording;

/// Signature of a built-in check
pub type CheckFn = fn(&LintContext<'_>, &[Event<'_, '_>]) -> Vec<Diagnostic>;

/// A rule backed by a check function
pub struct BuiltinRule {
    metadata: &'static RuleMetadata,
    interest: Interest,
    check: CheckFn,
}

impl BuiltinRule {
    pub const fn new(metadata: &'static RuleMetadata, interest: Interest, check: CheckFn) -> Self {
        Self {
            metadata,
            interest,
            check,
        }
    }
}

impl Rule for BuiltinRule {
    fn metadata(&self) -> &RuleMetadata {
        self.metadata
    }

    fn interest(&self) -> Interest {
        self.interest
    }

    fn check(&self, ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Result<Vec<Diagnostic>> {
        Ok((self.check)(ctx, events))
    }
}

/// Every built-in rule, in no particular order
pub fn all_rules() -> Vec<Arc<dyn Rule>> {
    [
        citations::rules(),
        commands::rules(),
        environments::rules(),
        footnotes::rules(),
        math::rules(),
        numerals::rules(),
        quotes::rules(),
        references::rules(),
        style::rules(),
        typography::rules(),
        urls::rules(),
        wording::rules(),
    ]
    .into_iter()
    .flatten()
    .map(|rule| Arc::new(rule) as Arc<dyn Rule>)
    .collect()
}

/// Citation commands
pub const CITE_COMMANDS: &[&str] = &["cite", "citep", "citet", "parencite", "autocite", "cites"];

/// Cross-reference commands
pub const REF_COMMANDS: &[&str] = &["ref", "eqref", "autoref", "cref", "Cref", "pageref", "vref"];

/// Text runs delivered as events of `kind`
pub(crate) fn text_runs<'e, 'd, 'a>(
    events: &'e [Event<'d, 'a>],
    kind: EventKind,
) -> impl Iterator<Item = &'d TextRun<'a>> {
    events
        .iter()
        .filter(move |event| event.kind == kind)
        .filter_map(|event| event.node().as_text())
}

/// Command events whose name is one of `names`
pub(crate) fn commands_named<'e, 'd, 'a>(
    events: &'e [Event<'d, 'a>],
    names: &'e [&'e str],
) -> impl Iterator<Item = (Visit<'d, 'a>, &'d Command<'a>)> {
    events
        .iter()
        .filter(|event| event.kind == EventKind::Command)
        .filter_map(move |event| {
            let cmd = event.node().as_command()?;
            names
                .iter()
                .any(|name| *name == cmd.name)
                .then_some((event.visit, cmd))
        })
}

/// Report every match of `pattern` in text runs of `kind`
pub(crate) fn report_matches(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
    kind: EventKind,
    metadata: &RuleMetadata,
    pattern: &Regex,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for run in text_runs(events, kind) {
        let base = run.span.start.offset;
        for m in pattern.find_iter(run.text) {
            diagnostics.push(ctx.report(metadata, base + m.start(), base + m.end()));
        }
    }
    diagnostics
}

/// Byte index where the trailing line-breaking whitespace of `text` starts
///
/// Requires a non-whitespace character before the whitespace in the same
/// run and no blank line inside it; a paragraph break is not a spacing
/// mistake.
pub(crate) fn trailing_break(text: &str) -> Option<usize> {
    let trimmed = text.trim_end();
    if trimmed.is_empty() || trimmed.len() == text.len() {
        return None;
    }
    let gap = &text[trimmed.len()..];
    if gap.matches('\n').count() > 1 {
        return None;
    }
    Some(trimmed.len())
}

/// Previous sibling as a text run
pub(crate) fn prev_text<'d, 'a>(visit: &Visit<'d, 'a>) -> Option<&'d TextRun<'a>> {
    visit.prev().and_then(|node| node.as_text())
}

/// Next sibling as a text run
pub(crate) fn next_text<'d, 'a>(visit: &Visit<'d, 'a>) -> Option<&'d TextRun<'a>> {
    visit.next().and_then(|node| node.as_text())
}

/// Flag a breaking space before any of `names`
pub(crate) fn check_space_before(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
    metadata: &RuleMetadata,
    names: &[&str],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (visit, _) in commands_named(events, names) {
        let Some(run) = prev_text(&visit) else {
            continue;
        };
        if let Some(idx) = trailing_break(run.text) {
            let base = run.span.start.offset;
            diagnostics.push(ctx.report(metadata, base + idx, run.span.end.offset));
        }
    }
    diagnostics
}

#[cfg(test)]
pub(crate) mod test_support {
    use draftcheck_core::{Diagnostic, LintContext, Rule, SourceMap, build_document, tokenize, walk};

    use super::BuiltinRule;
    use draftcheck_core::RuleMetadata;

    /// Pick the rule for `metadata` out of a module's rule list
    pub fn find(rules: Vec<BuiltinRule>, metadata: &RuleMetadata) -> BuiltinRule {
        rules
            .into_iter()
            .find(|rule| std::ptr::eq(rule.metadata, metadata))
            .unwrap()
    }

    /// Run a single rule over `source`
    pub fn run(rule: &BuiltinRule, source: &str) -> Vec<Diagnostic> {
        let tokens = tokenize(source);
        let built = build_document(source, &tokens);
        let map = SourceMap::new(source);
        let ctx = LintContext {
            file: "test.tex",
            source,
            source_map: &map,
            tokens: &tokens,
            document: &built.document,
        };
        let events = walk(&built.document, rule.interest());
        rule.check(&ctx, &events).unwrap()
    }

    /// Matched excerpts, in report order
    pub fn excerpts(rule: &BuiltinRule, source: &str) -> Vec<String> {
        run(rule, source)
            .into_iter()
            .map(|d| d.excerpt.unwrap_or_default())
            .collect()
    }
}
