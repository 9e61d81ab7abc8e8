//! Footnote placement

use draftcheck_core::{
    Diagnostic, Event, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};

use super::{BuiltinRule, check_space_before, commands_named, next_text};

const FOOTNOTE: &[&str] = &["footnote"];

pub static SPACE_BEFORE_FOOTNOTE: RuleMetadata = RuleMetadata {
    code: "001",
    name: "space-before-footnote",
    summary: "Do not precede footnotes with spaces.",
    explanation: r"Do not precede footnotes with spaces.

Remove the extraneous spaces before the \footnote command.

Bad:
    Napoleon's armies were defeated in Waterloo \footnote{In present day Belgium}.

Good:
    Napoleon's armies were defeated in Waterloo\footnote{In present day Belgium}.",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: true,
};

pub static FOOTNOTE_BEFORE_PUNCTUATION: RuleMetadata = RuleMetadata {
    code: "018",
    name: "footnote-before-punctuation",
    summary: "Place footnotes after punctuation marks.",
    explanation: r"Place footnotes after punctuation marks.

Bad:
    Napoleon's armies were defeated in Waterloo\footnote{In present day Belgium}.

Good:
    Napoleon's armies were defeated in Waterloo.\footnote{In present day Belgium}",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub fn rules() -> Vec<BuiltinRule> {
    let commands = Interest::none().with_commands();
    vec![
        BuiltinRule::new(&SPACE_BEFORE_FOOTNOTE, commands, check_space_before_footnote),
        BuiltinRule::new(
            &FOOTNOTE_BEFORE_PUNCTUATION,
            commands,
            check_footnote_before_punctuation,
        ),
    ]
}

pub fn check_space_before_footnote(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    check_space_before(ctx, events, &SPACE_BEFORE_FOOTNOTE, FOOTNOTE)
}

/// `\footnote{...}` immediately followed by `, ; . ?`
pub fn check_footnote_before_punctuation(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (visit, _) in commands_named(events, FOOTNOTE) {
        if let Some(run) = next_text(&visit)
            && run.text.starts_with([',', ';', '.', '?'])
        {
            let start = run.span.start.offset;
            diagnostics.push(ctx.report(&FOOTNOTE_BEFORE_PUNCTUATION, start, start + 1));
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{excerpts, find};

    #[test]
    fn test_space_before_footnote() {
        let r = find(rules(), &SPACE_BEFORE_FOOTNOTE);
        assert_eq!(excerpts(&r, "Waterloo \\footnote{x}."), vec![" "]);
        assert_eq!(excerpts(&r, "Waterloo \t\\footnote{x}."), vec![" \t"]);
        assert!(excerpts(&r, "Waterloo\\footnote{x}.").is_empty());
    }

    #[test]
    fn test_footnote_before_punctuation() {
        let r = find(rules(), &FOOTNOTE_BEFORE_PUNCTUATION);
        assert_eq!(excerpts(&r, "Waterloo\\footnote{x}, then"), vec![","]);
        assert!(excerpts(&r, "Waterloo.\\footnote{x} Then").is_empty());
        assert!(excerpts(&r, "Waterloo\\footnote{x} (1815).").is_empty());
    }
}
