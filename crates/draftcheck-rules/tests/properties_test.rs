//! End-to-end properties of the default engine over whole documents

use std::sync::Arc;

use draftcheck_core::{
    Diagnostic, DraftcheckError, Event, FileReport, Interest, LintContext, Result, Rule,
    RuleCategory, RuleMetadata, Severity, lint_source, summary_line,
};
use draftcheck_rules::DefaultRuleEngine;
use proptest::prelude::*;

fn lint(source: &str) -> FileReport {
    lint_source("paper.tex", source, &DefaultRuleEngine::new())
}

fn with_code<'a>(report: &'a FileReport, code: &str) -> Vec<&'a Diagnostic> {
    report.diagnostics.iter().filter(|d| d.code == code).collect()
}

#[test]
fn test_citation_spacing_cases() {
    assert!(with_code(&lint("\\LaTeX\\cite{lamport94}"), "004").is_empty());
    assert!(with_code(&lint("text~\\cite{x}"), "004").is_empty());

    let report = lint("text \\cite{x}");
    let found = with_code(&report, "004");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].span.start.line, 1);
    assert_eq!(found[0].span.start.column, 5);
    assert_eq!(found[0].excerpt.as_deref(), Some(" "));
}

#[test]
fn test_quote_balance() {
    assert!(with_code(&lint("``a'' and `b' here."), "014").is_empty());
    assert_eq!(with_code(&lint("``a and more."), "014").len(), 1);
    assert_eq!(with_code(&lint("some text'' here."), "014").len(), 1);

    let single = lint("He said no.' Then left.");
    let single = with_code(&single, "014");
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].span.start.column, 12);
}

#[test]
fn test_dollar_inside_text_in_math_is_not_structural() {
    let report = lint("See $a \\text{b $c$ d} e$ here.\n");
    assert!(
        report.diagnostics.iter().all(|d| !d.code.starts_with('9')),
        "{:?}",
        report.diagnostics
    );
}

#[test]
fn test_urls_only_flagged_outside_markup() {
    assert_eq!(with_code(&lint("Visit http://example.com today."), "030").len(), 1);
    assert!(with_code(&lint("Visit \\url{http://example.com} today."), "030").is_empty());
    assert!(
        with_code(
            &lint("\\begin{verbatim}\nhttp://example.com\n\\end{verbatim}\n"),
            "030"
        )
        .is_empty()
    );
}

#[test]
fn test_crossed_environments_still_lint() {
    let report = lint("\\begin{itemize}\\begin{enumerate}\\item see \\cite{x}\\end{itemize}");
    assert_eq!(with_code(&report, "900").len(), 1);
    assert_eq!(with_code(&report, "004").len(), 1);
}

#[test]
fn test_clean_document_has_no_diagnostics() {
    let source = "\\documentclass{article}\n\
                  \\usepackage{graphicx}\n\
                  \\begin{document}\n\
                  As shown by Lamport~\\cite{lamport94}, ``quotes'' are balanced.\n\
                  The code is at \\url{http://example.com/path}.\n\
                  \\begin{figure}\n\
                  \\centering\n\
                  \\includegraphics{plot}\n\
                  \\caption{Results}\n\
                  \\end{figure}\n\
                  \\end{document}\n";
    let report = lint(source);
    assert!(report.is_clean(), "{:?}", report.diagnostics);
    assert_eq!(summary_line(report.diagnostics.len()), "Total of 0 mistakes found.");
}

static PANICKING: RuleMetadata = RuleMetadata {
    code: "997",
    name: "always-panics",
    summary: "Panics.",
    explanation: "",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

static FAILING: RuleMetadata = RuleMetadata {
    code: "998",
    name: "always-fails",
    summary: "Fails.",
    explanation: "",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

static WORKING: RuleMetadata = RuleMetadata {
    code: "999",
    name: "flags-start",
    summary: "Start of file.",
    explanation: "",
    category: RuleCategory::General,
    severity: Severity::Info,
    recommended: true,
    show_spaces: false,
};

struct Panicking;
struct Failing;
struct Working;

impl Rule for Panicking {
    fn metadata(&self) -> &RuleMetadata {
        &PANICKING
    }

    fn interest(&self) -> Interest {
        Interest::none().with_prose()
    }

    fn check(
        &self,
        _ctx: &LintContext<'_>,
        _events: &[Event<'_, '_>],
    ) -> Result<Vec<Diagnostic>> {
        panic!("boom")
    }
}

impl Rule for Failing {
    fn metadata(&self) -> &RuleMetadata {
        &FAILING
    }

    fn interest(&self) -> Interest {
        Interest::none()
    }

    fn check(
        &self,
        _ctx: &LintContext<'_>,
        _events: &[Event<'_, '_>],
    ) -> Result<Vec<Diagnostic>> {
        Err(DraftcheckError::rule_error("998", "lookup failed"))
    }
}

impl Rule for Working {
    fn metadata(&self) -> &RuleMetadata {
        &WORKING
    }

    fn interest(&self) -> Interest {
        Interest::none()
    }

    fn check(
        &self,
        ctx: &LintContext<'_>,
        _events: &[Event<'_, '_>],
    ) -> Result<Vec<Diagnostic>> {
        Ok(vec![ctx.report(&WORKING, 0, 1)])
    }
}

#[test]
fn test_crashing_rules_are_isolated() {
    let engine = DefaultRuleEngine::from_rules(vec![
        Arc::new(Panicking),
        Arc::new(Failing),
        Arc::new(Working),
    ]);
    let report = lint_source("t.tex", "Some text.", &engine);
    assert_eq!(report.diagnostics.len(), 3);

    let panicked = with_code(&report, "997");
    assert_eq!(panicked[0].severity, Severity::Error);
    assert_eq!(panicked[0].message, "Rule crashed: boom");
    assert_eq!(panicked[0].name, "always-panics");

    let failed = with_code(&report, "998");
    assert!(failed[0].message.starts_with("Rule crashed: "));
    assert!(failed[0].message.contains("lookup failed"));

    let worked = with_code(&report, "999");
    assert_eq!(worked[0].severity, Severity::Info);
    assert_eq!(worked[0].excerpt.as_deref(), Some("S"));
}

const FRAGMENTS: &[&str] = &[
    "\\begin{itemize}",
    "\\end{itemize}",
    "\\begin{center}",
    "\\end{center}",
    "\\begin{verbatim}",
    "\\end{verbatim}",
    "\\item ",
    "{",
    "}",
    "$",
    "$$",
    "\\cite{a}",
    "\\ref{b}",
    "\\footnote{c}",
    "\\url{http://x.org}",
    "http://y.org",
    "\\bf ",
    "\\def",
    "% 15% comment\n",
    "``",
    "''",
    "'",
    "\"",
    " ",
    "  ",
    "~",
    "\n",
    "\n\n",
    ".",
    ",",
    " ,",
    "...",
    "(",
    " )",
    " - ",
    "sin",
    "1st",
    "5 kg",
    "the the",
    "etc.",
    "Fig. ",
    "word",
    "é",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn lint_is_deterministic(source in document()) {
        let engine = DefaultRuleEngine::new();
        let first = lint_source("p.tex", &source, &engine);
        let second = lint_source("p.tex", &source, &engine);
        prop_assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn builtin_rules_never_crash(source in document()) {
        let report = lint(&source);
        for diagnostic in &report.diagnostics {
            prop_assert!(
                !diagnostic.message.starts_with("Rule crashed"),
                "{} crashed on {:?}: {}",
                diagnostic.code,
                source,
                diagnostic.message
            );
        }
    }

    #[test]
    fn diagnostics_are_sorted_and_inside_the_source(source in document()) {
        let report = lint(&source);
        for pair in report.diagnostics.windows(2) {
            let a = (pair[0].span.start.line, pair[0].span.start.column);
            let b = (pair[1].span.start.line, pair[1].span.start.column);
            prop_assert!(a <= b);
        }
        for diagnostic in &report.diagnostics {
            prop_assert!(diagnostic.span.start.offset <= diagnostic.span.end.offset);
            prop_assert!(diagnostic.span.end.offset <= source.len());
        }
    }
}
