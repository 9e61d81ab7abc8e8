//! Quotation mark rules
//!
//! LaTeX has no smart quotes: an opening quote is typed with backticks and a
//! closing quote with apostrophes. [`check_unmatched_quotes`] tracks open
//! quotes per scope, where a scope is the nearest enclosing brace group,
//! command argument, environment or math span. Quotes left open when their
//! scope ends are reported there; a quote never pairs across a scope
//! boundary.

use draftcheck_core::{
    Diagnostic, Event, EventKind, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
    TextRun,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BuiltinRule, report_matches};

pub static STRAIGHT_DOUBLE_QUOTE: RuleMetadata = RuleMetadata {
    code: "013",
    name: "straight-double-quote",
    summary: r#"Use left and right quotation marks `` and '' rather than "."#,
    explanation: r#"Use left and right quotation marks `` and '' rather than ".

Bad:
    "Very much indeed," Alice said politely.

Good:
    ``Very much indeed,'' Alice said politely."#,
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static UNMATCHED_QUOTES: RuleMetadata = RuleMetadata {
    code: "014",
    name: "unmatched-quotes",
    summary: "Left quotes must be balanced by a matching right quote.",
    explanation: r"Left quotes must be balanced by a matching right quote.

Open with ` or `` and close with ' or '' of the same kind. A straight '
used as an opening quote comes out as a closing quote.

Bad:
    ``Very much indeed,' Alice said politely.

Bad:
    ``Very much indeed, Alice said politely.

Bad:
    He called it 'the plan' at the meeting.

Good:
    ``Very much indeed,'' Alice said politely.",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static TRIPLE_QUOTE: RuleMetadata = RuleMetadata {
    code: "026",
    name: "triple-quote",
    summary: r"Use a thin space \, to separate nested quotes.",
    explanation: r"Use a thin space \, to separate nested quotes.

Three quote characters in a row are ambiguous; separate the inner quote
from the outer one with a thin space.

Bad:
    ```Hello,' he said.''

Good:
    ``\,`Hello,' he said.''",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub fn rules() -> Vec<BuiltinRule> {
    let prose = Interest::none().with_prose();
    vec![
        BuiltinRule::new(&STRAIGHT_DOUBLE_QUOTE, prose, check_straight_double_quote),
        BuiltinRule::new(
            &UNMATCHED_QUOTES,
            prose.with_structure(),
            check_unmatched_quotes,
        ),
        BuiltinRule::new(&TRIPLE_QUOTE, prose, check_triple_quote),
    ]
}

static DOUBLE_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"""#).unwrap());

pub fn check_straight_double_quote(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &STRAIGHT_DOUBLE_QUOTE, &DOUBLE_QUOTE)
}

static TRIPLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```|'''").unwrap());

pub fn check_triple_quote(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &TRIPLE_QUOTE, &TRIPLE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Single,
    Double,
}

#[derive(Debug, Clone, Copy)]
struct OpenQuote {
    mark: Mark,
    start: usize,
    end: usize,
}

#[derive(Debug, Default)]
struct QuoteScope {
    open: Vec<OpenQuote>,
    /// A straight `'` that looked like an opening quote
    straight: Option<(usize, usize)>,
}

pub fn check_unmatched_quotes(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut scopes = vec![QuoteScope::default()];

    for event in events {
        match event.kind {
            EventKind::Enter => scopes.push(QuoteScope::default()),
            EventKind::Exit => {
                if scopes.len() > 1
                    && let Some(scope) = scopes.pop()
                {
                    report_unclosed(ctx, scope, &mut diagnostics);
                }
            }
            EventKind::Prose => {
                if let (Some(run), Some(scope)) = (event.node().as_text(), scopes.last_mut()) {
                    scan_run(ctx, run, scope, &mut diagnostics);
                }
            }
            _ => {}
        }
    }

    for scope in scopes.into_iter().rev() {
        report_unclosed(ctx, scope, &mut diagnostics);
    }
    diagnostics
}

fn report_unclosed(ctx: &LintContext<'_>, scope: QuoteScope, diagnostics: &mut Vec<Diagnostic>) {
    for quote in scope.open {
        diagnostics.push(ctx.report_with(
            &UNMATCHED_QUOTES,
            quote.start,
            quote.end,
            "Left quote is never closed.",
        ));
    }
}

fn scan_run(
    ctx: &LintContext<'_>,
    run: &TextRun<'_>,
    scope: &mut QuoteScope,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let text = run.text;
    let bytes = text.as_bytes();
    let base = run.span.start.offset;
    let alphanumeric = |c: Option<char>| c.is_some_and(char::is_alphanumeric);

    let mut idx = 0;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if byte != b'`' && byte != b'\'' {
            idx += 1;
            continue;
        }
        let width = if bytes.get(idx + 1) == Some(&byte) { 2 } else { 1 };
        let before = text[..idx].chars().next_back();
        let after = text[idx + width..].chars().next();
        let (start, end) = (base + idx, base + idx + width);
        idx += width;

        if byte == b'`' {
            let mark = if width == 2 { Mark::Double } else { Mark::Single };
            scope.open.push(OpenQuote { mark, start, end });
            continue;
        }

        if width == 2 {
            if alphanumeric(after) {
                continue;
            }
            match scope.open.pop() {
                None => diagnostics.push(ctx.report_with(
                    &UNMATCHED_QUOTES,
                    start,
                    end,
                    "Right quote has no matching left quote.",
                )),
                Some(open) if open.mark == Mark::Single => {
                    diagnostics.push(mismatch(ctx, open));
                }
                Some(_) => {}
            }
            continue;
        }

        // A single `'` inside or at the start of a word is an apostrophe or a
        // straight opening quote
        if alphanumeric(after) {
            if !alphanumeric(before) {
                scope.straight = Some((start, end));
            }
            continue;
        }

        match scope.open.last().map(|open| open.mark) {
            Some(Mark::Single) => {
                scope.open.pop();
            }
            // `students'` inside a double quote is a possessive
            Some(Mark::Double) if !alphanumeric(before) => {
                if let Some(open) = scope.open.pop() {
                    diagnostics.push(mismatch(ctx, open));
                }
            }
            _ => {
                if let Some((start, end)) = scope.straight.take() {
                    diagnostics.push(ctx.report_with(
                        &UNMATCHED_QUOTES,
                        start,
                        end,
                        "Use ` for a left single quote, not '.",
                    ));
                } else if scope.open.is_empty() && !alphanumeric(before) {
                    diagnostics.push(ctx.report_with(
                        &UNMATCHED_QUOTES,
                        start,
                        end,
                        "Right quote has no matching left quote.",
                    ));
                }
            }
        }
    }
}

fn mismatch(ctx: &LintContext<'_>, open: OpenQuote) -> Diagnostic {
    ctx.report_with(
        &UNMATCHED_QUOTES,
        open.start,
        open.end,
        "Left quote is closed by a right quote of a different kind.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{excerpts, find, run};

    fn unmatched(source: &str) -> Vec<String> {
        excerpts(&find(rules(), &UNMATCHED_QUOTES), source)
    }

    #[test]
    fn test_balanced_quotes_are_clean() {
        assert!(unmatched("``Very much indeed,'' Alice said.").is_empty());
        assert!(unmatched("`single' and ``double''").is_empty());
        assert!(unmatched("``She said `no' twice.''").is_empty());
        assert!(unmatched("It's the students' books.").is_empty());
        assert!(unmatched("``The students' books,'' he said.").is_empty());
    }

    #[test]
    fn test_mismatched_closer_flags_opener() {
        assert_eq!(unmatched("``Very much indeed,' Alice said."), vec!["``"]);
        assert_eq!(unmatched("`Very much indeed,'' Alice said."), vec!["`"]);
    }

    #[test]
    fn test_unclosed_opener_reported_at_scope_end() {
        let diagnostics = run(
            &find(rules(), &UNMATCHED_QUOTES),
            "\\emph{``open} and ``closed''",
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].span.start.column, 7);
        assert_eq!(diagnostics[0].message, "Left quote is never closed.");
    }

    #[test]
    fn test_quotes_do_not_pair_across_scopes() {
        assert_eq!(unmatched("``a {b'' c}").len(), 2);
    }

    #[test]
    fn test_unmatched_right_quote() {
        assert_eq!(unmatched("He said no.'' Then"), vec!["''"]);
        assert_eq!(unmatched("He said no.' Then left."), vec!["'"]);
        assert_eq!(unmatched("He said no.'"), vec!["'"]);
        // Possessives and apostrophes need no opening quote
        assert!(unmatched("The students' books and Jones' car.").is_empty());
    }

    #[test]
    fn test_straight_opening_quote() {
        assert_eq!(unmatched("He called it 'the plan' today."), vec!["'"]);
        assert!(unmatched("He called it `the plan' today.").is_empty());
    }

    #[test]
    fn test_math_and_verbatim_are_ignored() {
        assert!(unmatched("$f'(x)$ and \\verb|``|").is_empty());
        assert!(unmatched("\\begin{verbatim}``\n\\end{verbatim}").is_empty());
    }

    #[test]
    fn test_double_and_triple_quotes() {
        let double = find(rules(), &STRAIGHT_DOUBLE_QUOTE);
        assert_eq!(excerpts(&double, "\"Very much\" indeed"), vec!["\"", "\""]);
        assert!(excerpts(&double, "Erd\\\"os").is_empty());

        let triple = find(rules(), &TRIPLE_QUOTE);
        assert_eq!(excerpts(&triple, "```Hello,' he said.'''"), vec!["```", "'''"]);
        assert!(excerpts(&triple, "``\\,`Hello,' he said.''").is_empty());
    }
}
