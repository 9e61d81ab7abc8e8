//! Word-level mistakes: repeated words and mis-punctuated abbreviations

use draftcheck_core::{
    Diagnostic, Event, EventKind, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BuiltinRule, text_runs};

pub static DUPLICATE_WORD: RuleMetadata = RuleMetadata {
    code: "011",
    name: "duplicate-word",
    summary: "Remove duplicated word.",
    explanation: r"Remove duplicated word.

Bad:
    The two masks are symbols of the the ancient Muses.

Good:
    The two masks are symbols of the ancient Muses.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static ABBREVIATION_PUNCTUATION: RuleMetadata = RuleMetadata {
    code: "031",
    name: "abbreviation-punctuation",
    summary: "Punctuate abbreviations correctly.",
    explanation: r"Punctuate abbreviations correctly.

Covers et al., etc., i.e. and e.g., and the British Dr without a period.

Bad:
    Smith et. al. showed this first.

Good:
    Smith et al. showed this first.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub fn rules() -> Vec<BuiltinRule> {
    let prose = Interest::none().with_prose();
    vec![
        BuiltinRule::new(&DUPLICATE_WORD, prose, check_duplicate_word),
        BuiltinRule::new(
            &ABBREVIATION_PUNCTUATION,
            prose,
            check_abbreviation_punctuation,
        ),
    ]
}

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+").unwrap());

/// The same word twice with only whitespace between, ignoring case
pub fn check_duplicate_word(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for run in text_runs(events, EventKind::Prose) {
        let base = run.span.start.offset;
        let mut previous: Option<regex::Match<'_>> = None;
        for word in WORD.find_iter(run.text) {
            if let Some(prev) = previous {
                let gap = &run.text[prev.end()..word.start()];
                if !gap.is_empty()
                    && gap.chars().all(char::is_whitespace)
                    && prev.as_str().to_lowercase() == word.as_str().to_lowercase()
                {
                    diagnostics.push(ctx.report(
                        &DUPLICATE_WORD,
                        base + prev.start(),
                        base + word.end(),
                    ));
                }
            }
            previous = Some(word);
        }
    }
    diagnostics
}

/// Pattern, with the flagged part as group 1, and the correct spelling
static ABBREVIATIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\b(et\. al\.)", "et al."),
        (r"\b(etc)\b(?:[^.]|$)", "etc."),
        (r"\b(i\.e)(?:[^.]|$)", "i.e."),
        (r"\b(e\.g)(?:[^.]|$)", "e.g."),
        (r"\b(Dr\.)", "Dr"),
    ]
    .into_iter()
    .map(|(pattern, correct)| (Regex::new(pattern).unwrap(), correct))
    .collect()
});

pub fn check_abbreviation_punctuation(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for run in text_runs(events, EventKind::Prose) {
        let base = run.span.start.offset;
        for (pattern, correct) in ABBREVIATIONS.iter() {
            for caps in pattern.captures_iter(run.text) {
                if let Some(m) = caps.get(1) {
                    diagnostics.push(ctx.report_with(
                        &ABBREVIATION_PUNCTUATION,
                        base + m.start(),
                        base + m.end(),
                        format!("Punctuate abbreviations correctly. Should be \"{correct}\"."),
                    ));
                }
            }
        }
    }
    diagnostics
}
