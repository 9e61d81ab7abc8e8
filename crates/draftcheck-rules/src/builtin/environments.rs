//! Environment usage rules

use draftcheck_core::{
    Diagnostic, Environment, Event, EventKind, Interest, LintContext, Node, RuleCategory,
    RuleMetadata, Severity,
};

use super::BuiltinRule;

pub static CENTER_ENVIRONMENT: RuleMetadata = RuleMetadata {
    code: "015",
    name: "center-environment",
    summary: r"Use \centering instead of \begin{center}.",
    explanation: r"Use \centering instead of \begin{center}.

The center environment adds vertical space around its content, which is
rarely wanted inside floats.

Bad:
    \begin{figure}
        \begin{center}
            \includegraphics{engine}
        \end{center}
    \end{figure}

Good:
    \begin{figure}
        \centering
        \includegraphics{engine}
    \end{figure}",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static OBSOLETE_ENVIRONMENT: RuleMetadata = RuleMetadata {
    code: "034",
    name: "obsolete-environment",
    summary: "Avoid obsolete environments.",
    explanation: r"Avoid obsolete environments.

eqnarray spaces its columns inconsistently; use align from amsmath.
The appendix environment is not standard LaTeX; use the \appendix command.

Bad:
    \begin{eqnarray}
        a &=& b
    \end{eqnarray}

Good:
    \begin{align}
        a &= b
    \end{align}",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

/// Replacement advice for obsolete environments
const OBSOLETE_ENVIRONMENTS: &[(&str, &str)] = &[
    ("eqnarray", r#"Use the "align" environment instead."#),
    ("eqnarray*", r#"Use the "align*" environment instead."#),
    ("appendix", r"Use the \appendix command instead."),
];

pub fn rules() -> Vec<BuiltinRule> {
    let structure = Interest::none().with_structure();
    vec![
        BuiltinRule::new(&CENTER_ENVIRONMENT, structure, check_center_environment),
        BuiltinRule::new(&OBSOLETE_ENVIRONMENT, structure, check_obsolete_environment),
    ]
}

/// Environments entered, with their begin markers
fn entered<'e, 'd, 'a>(
    events: &'e [Event<'d, 'a>],
) -> impl Iterator<Item = &'d Environment<'a>> {
    events
        .iter()
        .filter(|event| event.kind == EventKind::Enter && event.visit.argument.is_none())
        .filter_map(|event| match event.node() {
            Node::Environment(env) => Some(env),
            _ => None,
        })
}

pub fn check_center_environment(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    entered(events)
        .filter(|env| env.name == "center")
        .map(|env| {
            ctx.report_span(&CENTER_ENVIRONMENT, env.begin, CENTER_ENVIRONMENT.summary)
        })
        .collect()
}

pub fn check_obsolete_environment(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    entered(events)
        .filter_map(|env| {
            let (_, advice) = OBSOLETE_ENVIRONMENTS
                .iter()
                .find(|(name, _)| *name == env.name)?;
            Some(ctx.report_span(&OBSOLETE_ENVIRONMENT, env.begin, *advice))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{excerpts, find, run};

    #[test]
    fn test_center_environment_flags_begin_marker() {
        let r = find(rules(), &CENTER_ENVIRONMENT);
        let source = "\\begin{figure}\n\\begin{center}\nx\n\\end{center}\n\\end{figure}";
        assert_eq!(excerpts(&r, source), vec!["\\begin{center}"]);
        assert!(excerpts(&r, "\\begin{figure}\\centering x\\end{figure}").is_empty());
    }

    #[test]
    fn test_obsolete_environments() {
        let r = find(rules(), &OBSOLETE_ENVIRONMENT);
        let source = "\\begin{eqnarray*}a\\end{eqnarray*}\\begin{appendix}\\end{appendix}";
        let diagnostics = run(&r, source);
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                r#"Use the "align*" environment instead."#,
                r"Use the \appendix command instead."
            ]
        );
        assert!(run(&r, "\\begin{align}a\\end{align}").is_empty());
    }
}
