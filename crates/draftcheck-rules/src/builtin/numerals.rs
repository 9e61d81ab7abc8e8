//! Numbers in running text

use draftcheck_core::{
    Diagnostic, Event, EventKind, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BuiltinRule, report_matches, text_runs};

pub static NUMBER_UNIT_SPACING: RuleMetadata = RuleMetadata {
    code: "021",
    name: "number-unit-spacing",
    summary: "Place a non-breaking space between a number and its unit.",
    explanation: r"Place a non-breaking space between a number and its unit.

Bad:
    The package weighs 5kg in total.

Good:
    The package weighs 5~kg in total.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static ORDINAL_NUMERALS: RuleMetadata = RuleMetadata {
    code: "027",
    name: "ordinal-numerals",
    summary: "Spell out ordinal numbers (1st, 2nd, etc.) in words.",
    explanation: r"Spell out ordinal numbers (1st, 2nd, etc.) in words.

Bad:
    It worked on the 1st attempt.

Good:
    It worked on the first attempt.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static SINGLE_DIGIT_NUMERALS: RuleMetadata = RuleMetadata {
    code: "028",
    name: "single-digit-numerals",
    summary: "Spell out single digit numbers in words.",
    explanation: r"Spell out single digit numbers in words.

Bad:
    Then we ran 3 experiments on the new data.

Good:
    Then we ran three experiments on the new data.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub fn rules() -> Vec<BuiltinRule> {
    let prose = Interest::none().with_prose();
    vec![
        BuiltinRule::new(&NUMBER_UNIT_SPACING, prose, check_number_unit_spacing),
        BuiltinRule::new(&ORDINAL_NUMERALS, prose, check_ordinal_numerals),
        BuiltinRule::new(&SINGLE_DIGIT_NUMERALS, prose, check_single_digit_numerals),
    ]
}

// Bare "s" is left out: "1990s" is a decade, not a duration
static NUMBER_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d+(?:\.\d+)?(?:kg|mg|g|km|cm|mm|m|ms|kHz|MHz|GHz|Hz|kW|W|mol|cd|K|A|V|J|N|Pa)\b",
    )
    .unwrap()
});

pub fn check_number_unit_spacing(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &NUMBER_UNIT_SPACING, &NUMBER_UNIT)
}

static ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[1-9](?:st|nd|rd|th)\b").unwrap());

pub fn check_ordinal_numerals(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &ORDINAL_NUMERALS, &ORDINAL)
}

static LONE_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]+ (\d) [a-z]+\b").unwrap());

/// A digit standing alone between two lowercase words
pub fn check_single_digit_numerals(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for run in text_runs(events, EventKind::Prose) {
        let base = run.span.start.offset;
        for caps in LONE_DIGIT.captures_iter(run.text) {
            if let Some(digit) = caps.get(1) {
                diagnostics.push(ctx.report(
                    &SINGLE_DIGIT_NUMERALS,
                    base + digit.start(),
                    base + digit.end(),
                ));
            }
        }
    }
    diagnostics
}
