//! Citation placement rules
//!
//! Citations belong inside the sentence they support, attached to the
//! preceding word with a non-breaking space, and are never the subject or
//! object of a sentence.

use draftcheck_core::{
    Diagnostic, Event, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BuiltinRule, CITE_COMMANDS, check_space_before, commands_named, prev_text};

pub static CITE_AFTER_PERIOD: RuleMetadata = RuleMetadata {
    code: "002",
    name: "cite-after-period",
    summary: "Place citations before periods with a non-breaking space.",
    explanation: r"Place citations before periods with a non-breaking space.

Move the \cite command inside the sentence, before the period.

Bad:
    Johannes Brahms was born in Hamburg.\cite{brahms}

Good:
    Johannes Brahms was born in Hamburg~\cite{brahms}.",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static CITE_AS_NOUN: RuleMetadata = RuleMetadata {
    code: "003",
    name: "cite-as-noun",
    summary: "Avoid using citations as nouns.",
    explanation: r"Avoid using citations as nouns.

A citation supports a statement; it should not stand in for the work it
points to.

Bad:
    The method proposed in~\cite{smith} shows a decrease in methanol toxicity.

Good:
    A proposed method shows a decrease in methanol toxicity~\cite{smith}.",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static CITATION_SPACING: RuleMetadata = RuleMetadata {
    code: "004",
    name: "citation-spacing",
    summary: "Place a single, non-breaking space '~' before citations.",
    explanation: r#"Place a single, non-breaking space '~' before citations.

A plain space or a line break lets the citation wrap onto the next line,
away from the word it belongs to.

Bad:
    Apollo 17's "The Blue Marble" \cite{nasa72} photo of the Earth became an icon.

Good:
    Apollo 17's "The Blue Marble"~\cite{nasa72} photo of the Earth became an icon."#,
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: true,
};

pub static MULTIPLE_CITE: RuleMetadata = RuleMetadata {
    code: "020",
    name: "multiple-cite",
    summary: r"Use \cite{..., ...} for multiple citations.",
    explanation: r"Use \cite{..., ...} for multiple citations.

One command with several keys lets the bibliography style sort and
compress the labels.

Bad:
    Several studies~\cite{smith}\cite{jones} agree.

Good:
    Several studies~\cite{smith,jones} agree.",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub fn rules() -> Vec<BuiltinRule> {
    let commands = Interest::none().with_commands();
    vec![
        BuiltinRule::new(&CITE_AFTER_PERIOD, commands, check_cite_after_period),
        BuiltinRule::new(&CITE_AS_NOUN, commands, check_cite_as_noun),
        BuiltinRule::new(&CITATION_SPACING, commands, check_citation_spacing),
        BuiltinRule::new(&MULTIPLE_CITE, commands, check_multiple_cite),
    ]
}

/// `\cite` directly after a period
pub fn check_cite_after_period(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (visit, cmd) in commands_named(events, CITE_COMMANDS) {
        if let Some(run) = prev_text(&visit)
            && run.text.ends_with('.')
        {
            let period = run.span.end.offset - 1;
            diagnostics.push(ctx.report(&CITE_AFTER_PERIOD, period, cmd.head.end.offset));
        }
    }
    diagnostics
}

static NOUN_PREPOSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:in|as|on|by)[ ~]$").unwrap());

/// `in~\cite{...}` and friends
pub fn check_cite_as_noun(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (visit, cmd) in commands_named(events, CITE_COMMANDS) {
        let Some(run) = prev_text(&visit) else {
            continue;
        };
        if let Some(m) = NOUN_PREPOSITION.find(run.text) {
            let start = run.span.start.offset + m.start();
            diagnostics.push(ctx.report(&CITE_AS_NOUN, start, cmd.head.end.offset));
        }
    }
    diagnostics
}

pub fn check_citation_spacing(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    check_space_before(ctx, events, &CITATION_SPACING, CITE_COMMANDS)
}

/// A citation directly after another, possibly separated by blanks or `~`
pub fn check_multiple_cite(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (visit, cmd) in commands_named(events, CITE_COMMANDS) {
        let previous = match visit.prev() {
            Some(node) if node.is_command_in(CITE_COMMANDS) => Some(node),
            Some(node)
                if node
                    .as_text()
                    .is_some_and(|run| run.text.chars().all(|c| c.is_whitespace() || c == '~')) =>
            {
                visit
                    .index
                    .checked_sub(2)
                    .and_then(|idx| visit.siblings.get(idx))
                    .filter(|node| node.is_command_in(CITE_COMMANDS))
            }
            _ => None,
        };
        if let Some(previous) = previous {
            let start = previous.span().start.offset;
            diagnostics.push(ctx.report(&MULTIPLE_CITE, start, cmd.head.end.offset));
        }
    }
    diagnostics
}
