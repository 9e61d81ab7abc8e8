//! Bare URLs in prose

use draftcheck_core::{
    Diagnostic, Event, EventKind, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BuiltinRule, text_runs};

pub static BARE_URL: RuleMetadata = RuleMetadata {
    code: "030",
    name: "bare-url",
    summary: r"Wrap URLs in \url{...} or \href{...}{...}.",
    explanation: r"Wrap URLs in \url{...} or \href{...}{...}.

A bare URL is hyphenated and broken at arbitrary points, and characters
such as % and _ in it are misinterpreted.

Bad:
    The data is available at https://example.org/data for download.

Good:
    The data is available at \url{https://example.org/data} for download.",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub fn rules() -> Vec<BuiltinRule> {
    vec![BuiltinRule::new(
        &BARE_URL,
        Interest::none().with_prose(),
        check_bare_url,
    )]
}

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[a-zA-Z][a-zA-Z0-9+.-]*://|www\.)[^\s{}\\]+").unwrap()
});

/// URL-shaped text outside `\url`/`\href`, which the walk already hides
pub fn check_bare_url(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for run in text_runs(events, EventKind::Prose) {
        let base = run.span.start.offset;
        for m in URL.find_iter(run.text) {
            // Sentence punctuation after a URL is not part of it
            let url = m.as_str().trim_end_matches(['.', ',', ';', ':', ')']);
            let start = base + m.start();
            diagnostics.push(ctx.report(&BARE_URL, start, start + url.len()));
        }
    }
    diagnostics
}
