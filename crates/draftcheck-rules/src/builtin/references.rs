//! Cross-reference spacing

use draftcheck_core::{
    Diagnostic, Event, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};

use super::{BuiltinRule, REF_COMMANDS, check_space_before};

pub static REFERENCE_SPACING: RuleMetadata = RuleMetadata {
    code: "005",
    name: "reference-spacing",
    summary: "Place a single, non-breaking space '~' before references.",
    explanation: r"Place a single, non-breaking space '~' before references.

Applies to \ref, \eqref, \autoref, \cref, \Cref, \pageref and \vref.

Bad:
    The performance of the engine is shown in Figure \ref{fig:engine}.

Good:
    The performance of the engine is shown in Figure~\ref{fig:engine}.",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: true,
};

pub fn rules() -> Vec<BuiltinRule> {
    vec![BuiltinRule::new(
        &REFERENCE_SPACING,
        Interest::none().with_commands(),
        check_reference_spacing,
    )]
}

pub fn check_reference_spacing(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    check_space_before(ctx, events, &REFERENCE_SPACING, REF_COMMANDS)
}
