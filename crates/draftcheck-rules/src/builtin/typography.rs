//! Spacing, punctuation and dash rules over prose

use draftcheck_core::{
    Diagnostic, Event, EventKind, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BuiltinRule, prev_text, report_matches, text_runs};

pub static UNESCAPED_PERCENT: RuleMetadata = RuleMetadata {
    code: "006",
    name: "unescaped-percent",
    summary: "Escape percentages with backslash.",
    explanation: r"Escape percentages with backslash.

A bare % starts a comment and silently drops the rest of the line.

Bad:
    The company's stocks rose by 15% last year.

Good:
    The company's stocks rose by 15\% last year.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static SPACE_BEFORE_PUNCTUATION: RuleMetadata = RuleMetadata {
    code: "007",
    name: "space-before-punctuation",
    summary: "Do not precede punctuation characters with spaces.",
    explanation: r"Do not precede punctuation characters with spaces.

Bad:
    Coleridge wrote The Rime of the Ancient Mariner , in Nether Stowey.

Good:
    Coleridge wrote The Rime of the Ancient Mariner, in Nether Stowey.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: true,
};

pub static PARENTHESIS_SPACING: RuleMetadata = RuleMetadata {
    code: "008",
    name: "parenthesis-spacing",
    summary: "Separate parentheses from text with a space.",
    explanation: r"Separate parentheses from text with a space.

Bad:
    I went to his house yesterday(my third attempt to see him).

Good:
    I went to his house yesterday (my third attempt to see him).",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: true,
};

pub static X_AS_TIMES: RuleMetadata = RuleMetadata {
    code: "009",
    name: "x-as-times",
    summary: r"In the context of 'times', use $\times$ instead of 'x'.",
    explanation: r"In the context of 'times', use $\times$ instead of 'x'.

Bad:
    We used a 10x10 grid for the image filter.

Good:
    We used a $10 \times 10$ grid for the image filter.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static SPACED_HYPHEN_DASH: RuleMetadata = RuleMetadata {
    code: "010",
    name: "spaced-hyphen-dash",
    summary: "Use an em-dash '---' to denote parenthetical breaks or statements.",
    explanation: r"Use an em-dash '---' to denote parenthetical breaks or statements.

Bad:
    He only desired one thing - success.

Good:
    He only desired one thing --- success.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: true,
};

pub static DOTS_ELLIPSIS: RuleMetadata = RuleMetadata {
    code: "012",
    name: "dots-ellipsis",
    summary: r"Typeset ellipses by \ldots, not '...'.",
    explanation: r"Typeset ellipses by \ldots, not '...'.

Bad:
    New York, Tokyo, Budapest, ...

Good:
    New York, Tokyo, Budapest, \ldots",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static NUMERIC_RANGE_DASH: RuleMetadata = RuleMetadata {
    code: "017",
    name: "numeric-range-dash",
    summary: "Use an en-dash '--' for numeric ranges instead of hyphens.",
    explanation: r"Use an en-dash '--' for numeric ranges instead of hyphens.

Bad:
    A description of medical practices at the time is on pages 17-20.

Good:
    A description of medical practices at the time is on pages 17--20.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static ANGLE_BRACKET_OPERATORS: RuleMetadata = RuleMetadata {
    code: "019",
    name: "angle-bracket-operators",
    summary: r"Use math mode or \langle and \rangle instead of '<' and '>' in text.",
    explanation: r"Use math mode or \langle and \rangle instead of '<' and '>' in text.

In text mode these characters come out as inverted exclamation and
question marks with the default font encoding.

Bad:
    The loop runs while x<y holds.

Good:
    The loop runs while $x < y$ holds.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static ABBREVIATION_SPACING: RuleMetadata = RuleMetadata {
    code: "023",
    name: "abbreviation-spacing",
    summary: r"Place '\ ' (backslash space) after a period that does not end a sentence.",
    explanation: r"Place '\ ' (backslash space) after a period that does not end a sentence.

Otherwise the period is treated as a full stop and followed by a wider
inter-sentence space.

Bad:
    Bring some fruit, e.g. apples and pears.

Good:
    Bring some fruit, e.g.\ apples and pears.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub fn rules() -> Vec<BuiltinRule> {
    let prose = Interest::none().with_prose();
    vec![
        BuiltinRule::new(
            &UNESCAPED_PERCENT,
            Interest::none().with_comments(),
            check_unescaped_percent,
        ),
        BuiltinRule::new(&SPACE_BEFORE_PUNCTUATION, prose, check_space_before_punctuation),
        BuiltinRule::new(&PARENTHESIS_SPACING, prose, check_parenthesis_spacing),
        BuiltinRule::new(&X_AS_TIMES, prose, check_x_as_times),
        BuiltinRule::new(&SPACED_HYPHEN_DASH, prose, check_spaced_hyphen_dash),
        BuiltinRule::new(&DOTS_ELLIPSIS, prose, check_dots_ellipsis),
        BuiltinRule::new(&NUMERIC_RANGE_DASH, prose, check_numeric_range_dash),
        BuiltinRule::new(&ANGLE_BRACKET_OPERATORS, prose, check_angle_brackets),
        BuiltinRule::new(&ABBREVIATION_SPACING, prose, check_abbreviation_spacing),
    ]
}

/// A comment that starts right after a number
pub fn check_unescaped_percent(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for event in events.iter().filter(|e| e.kind == EventKind::Comment) {
        let Some(run) = prev_text(&event.visit) else {
            continue;
        };
        let digits = run.text.trim_end_matches(|c: char| c.is_ascii_digit());
        if digits.len() == run.text.len() {
            continue;
        }
        let start = run.span.start.offset + digits.len();
        let percent = event.node().span().start.offset;
        diagnostics.push(ctx.report(&UNESCAPED_PERCENT, start, percent + 1));
    }
    diagnostics
}

static SPACE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+[,;.!?]").unwrap());

/// Whitespace before punctuation; `.5` and `...` are not punctuation here
pub fn check_space_before_punctuation(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for run in text_runs(events, EventKind::Prose) {
        for m in SPACE_PUNCTUATION.find_iter(run.text) {
            let rest = &run.text[m.end()..];
            let punct = &run.text[m.end() - 1..m.end()];
            let decimal = rest.starts_with(|c: char| c.is_ascii_digit());
            if decimal || (punct == "." && rest.starts_with('.')) {
                continue;
            }
            let base = run.span.start.offset;
            diagnostics.push(ctx.report(
                &SPACE_BEFORE_PUNCTUATION,
                base + m.start(),
                base + m.end(),
            ));
        }
    }
    diagnostics
}

static GLUED_PARENTHESIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}\(|\)\p{L}").unwrap());

pub fn check_parenthesis_spacing(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &PARENTHESIS_SPACING, &GLUED_PARENTHESIS)
}

static X_TIMES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\s?x\d+").unwrap());

pub fn check_x_as_times(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &X_AS_TIMES, &X_TIMES)
}

static SPACED_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+-[ \t]+").unwrap());

/// ` - ` with a letter on each side
pub fn check_spaced_hyphen_dash(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for run in text_runs(events, EventKind::Prose) {
        for m in SPACED_HYPHEN.find_iter(run.text) {
            let before = run.text[..m.start()].chars().next_back();
            let after = run.text[m.end()..].chars().next();
            if before.is_some_and(char::is_alphabetic) && after.is_some_and(char::is_alphabetic) {
                let base = run.span.start.offset;
                let (start, end) = (base + m.start(), base + m.end());
                diagnostics.push(ctx.report(&SPACED_HYPHEN_DASH, start, end));
            }
        }
    }
    diagnostics
}

static THREE_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.\.").unwrap());

pub fn check_dots_ellipsis(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &DOTS_ELLIPSIS, &THREE_DOTS)
}

static HYPHEN_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d\s?-\s?\d").unwrap());

pub fn check_numeric_range_dash(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &NUMERIC_RANGE_DASH, &HYPHEN_RANGE)
}

static ANGLE_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[<>]\b").unwrap());

pub fn check_angle_brackets(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &ANGLE_BRACKET_OPERATORS, &ANGLE_BRACKET)
}

static LATIN_ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:e\.g|i\.e)\.\s+").unwrap());

pub fn check_abbreviation_spacing(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &ABBREVIATION_SPACING, &LATIN_ABBREVIATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{excerpts, find};

    #[test]
    fn test_unescaped_percent() {
        let r = find(rules(), &UNESCAPED_PERCENT);
        assert_eq!(excerpts(&r, "rose by 15% last year"), vec!["15%"]);
        assert!(excerpts(&r, "rose by 15\\% last year").is_empty());
        assert!(excerpts(&r, "text % a real comment").is_empty());
    }

    #[test]
    fn test_space_before_punctuation() {
        let r = find(rules(), &SPACE_BEFORE_PUNCTUATION);
        assert_eq!(excerpts(&r, "Mariner , is ; here"), vec![" ,", " ;"]);
        assert_eq!(excerpts(&r, "end\n."), vec!["\n."]);
        assert!(excerpts(&r, "a value of .5 and so on ...").is_empty());
        assert!(excerpts(&r, "Mariner, is").is_empty());
    }

    #[test]
    fn test_parenthesis_spacing() {
        let r = find(rules(), &PARENTHESIS_SPACING);
        assert_eq!(excerpts(&r, "yesterday(my attempt)again"), vec!["y(", ")a"]);
        assert!(excerpts(&r, "yesterday (my attempt) again").is_empty());
    }

    #[test]
    fn test_x_as_times() {
        let r = find(rules(), &X_AS_TIMES);
        assert_eq!(excerpts(&r, "a 10x10 grid and 3 x4 one"), vec!["10x10", "3 x4"]);
        assert!(excerpts(&r, "a $10 \\times 10$ grid").is_empty());
        assert!(excerpts(&r, "0xff").is_empty());
    }

    #[test]
    fn test_spaced_hyphen_dash() {
        let r = find(rules(), &SPACED_HYPHEN_DASH);
        assert_eq!(excerpts(&r, "one thing - success"), vec![" - "]);
        assert!(excerpts(&r, "one thing --- success").is_empty());
        assert!(excerpts(&r, "range 3 - 4").is_empty());
        assert!(excerpts(&r, "well-known").is_empty());
    }

    #[test]
    fn test_dots_and_ranges() {
        let dots = find(rules(), &DOTS_ELLIPSIS);
        assert_eq!(excerpts(&dots, "Tokyo, ..."), vec!["..."]);
        assert!(excerpts(&dots, "Tokyo, \\ldots").is_empty());

        let range = find(rules(), &NUMERIC_RANGE_DASH);
        assert_eq!(excerpts(&range, "pages 17-20 and 3 - 4"), vec!["7-2", "3 - 4"]);
        assert!(excerpts(&range, "pages 17--20").is_empty());
    }

    #[test]
    fn test_angle_brackets_only_in_prose() {
        let r = find(rules(), &ANGLE_BRACKET_OPERATORS);
        assert_eq!(excerpts(&r, "while x<y holds"), vec!["<"]);
        assert!(excerpts(&r, "while $x<y$ holds").is_empty());
        assert!(excerpts(&r, "a -> b").is_empty());
    }

    #[test]
    fn test_abbreviation_spacing() {
        let r = find(rules(), &ABBREVIATION_SPACING);
        assert_eq!(excerpts(&r, "fruit, e.g. apples, i.e.  pears"), vec!["e.g. ", "i.e.  "]);
        assert!(excerpts(&r, "fruit, e.g.\\ apples").is_empty());
        assert!(excerpts(&r, "fruit, e.g., apples").is_empty());
    }
}
