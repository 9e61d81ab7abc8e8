//! Math mode rules
//!
//! These see only text inside math: inline and display math spans and math
//! environments, minus `\text{...}`-style arguments.

use draftcheck_core::{
    Diagnostic, Event, EventKind, Interest, LintContext, Node, RuleCategory, RuleMetadata,
    Severity,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BuiltinRule, report_matches, text_runs};

pub static DOUBLE_DOLLAR_MATH: RuleMetadata = RuleMetadata {
    code: "016",
    name: "double-dollar-math",
    summary: r"Use \[ or \begin{equation} instead of $$.",
    explanation: r"Use \[ or \begin{equation} instead of $$.

$$ is plain TeX; it ignores document class options such as fleqn and
spaces the display inconsistently.

Bad:
    $$ 1 + 1 = 2 $$

Good:
    \[ 1 + 1 = 2 \]

Good:
    \begin{equation}
        1 + 1 = 2
    \end{equation}",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static NAMED_MATH_OPERATOR: RuleMetadata = RuleMetadata {
    code: "022",
    name: "named-math-operator",
    summary: "Precede named mathematical operators with a backslash.",
    explanation: r"Precede named mathematical operators with a backslash.

Plain letters are set in italics as a product of variables; \sin, \log and
friends are set upright with correct spacing.

Bad:
    $y = sin x$

Good:
    $y = \sin x$",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static MATH_ELLIPSIS: RuleMetadata = RuleMetadata {
    code: "029",
    name: "math-ellipsis",
    summary: r"Use \cdots to denote ellipsis in maths.",
    explanation: r"Use \cdots to denote ellipsis in maths.

Bad:
    $x_1, ..., x_n$

Good:
    $x_1, \cdots, x_n$",
    category: RuleCategory::Typography,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

const NAMED_OPERATORS: &[&str] = &[
    "sin", "cos", "tan", "log", "max", "min", "exp", "det", "lim", "ln",
];

pub fn rules() -> Vec<BuiltinRule> {
    let math = Interest::none().with_math_text();
    vec![
        BuiltinRule::new(
            &DOUBLE_DOLLAR_MATH,
            Interest::none().with_structure(),
            check_double_dollar_math,
        ),
        BuiltinRule::new(&NAMED_MATH_OPERATOR, math, check_named_math_operator),
        BuiltinRule::new(&MATH_ELLIPSIS, math, check_math_ellipsis),
    ]
}

pub fn check_double_dollar_math(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    events
        .iter()
        .filter(|event| event.kind == EventKind::Enter)
        .filter_map(|event| match event.node() {
            Node::Math(math) if math.open.text(ctx.source) == "$$" => Some(math.open),
            _ => None,
        })
        .map(|open| ctx.report_span(&DOUBLE_DOLLAR_MATH, open, DOUBLE_DOLLAR_MATH.summary))
        .collect()
}

static LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").unwrap());

/// Operator names spelled as bare letters
pub fn check_named_math_operator(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for run in text_runs(events, EventKind::MathText) {
        let base = run.span.start.offset;
        for m in LETTERS.find_iter(run.text) {
            if NAMED_OPERATORS.iter().any(|name| *name == m.as_str()) {
                diagnostics.push(ctx.report_with(
                    &NAMED_MATH_OPERATOR,
                    base + m.start(),
                    base + m.end(),
                    format!(r"Use \{} instead of '{}'.", m.as_str(), m.as_str()),
                ));
            }
        }
    }
    diagnostics
}

static COMMA_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\.\.\.\s*,").unwrap());

pub fn check_math_ellipsis(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::MathText, &MATH_ELLIPSIS, &COMMA_DOTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{excerpts, find, run};

    #[test]
    fn test_double_dollar_math() {
        let r = find(rules(), &DOUBLE_DOLLAR_MATH);
        assert_eq!(excerpts(&r, "see $$ 1 + 1 = 2 $$ here"), vec!["$$"]);
        assert!(excerpts(&r, "see \\[ 1 + 1 = 2 \\] and $x$").is_empty());
    }

    #[test]
    fn test_named_operators_in_math_only() {
        let r = find(rules(), &NAMED_MATH_OPERATOR);
        assert_eq!(excerpts(&r, "$y = sin x + log z$"), vec!["sin", "log"]);
        assert_eq!(
            excerpts(&r, "\\begin{equation}\\max_x f = max\\end{equation}"),
            vec!["max"]
        );
        assert!(excerpts(&r, "the sin of $x$").is_empty());
        assert!(excerpts(&r, "$\\sin x \\text{ min } \\mathrm{cos}$").is_empty());
        assert!(excerpts(&r, "$single$").is_empty());
        assert_eq!(run(&r, "$sin$")[0].message, r"Use \sin instead of 'sin'.");
    }

    #[test]
    fn test_math_ellipsis() {
        let r = find(rules(), &MATH_ELLIPSIS);
        assert_eq!(excerpts(&r, "$x_1, ..., x_n$"), vec![", ...,"]);
        assert!(excerpts(&r, "$x_1, \\cdots, x_n$").is_empty());
        assert!(excerpts(&r, "a, ..., b").is_empty());
    }
}
