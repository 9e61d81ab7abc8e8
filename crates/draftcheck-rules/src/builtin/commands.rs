//! Discouraged and obsolete commands and packages

use draftcheck_core::{
    Diagnostic, Event, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};

use super::{BuiltinRule, commands_named};

pub static DEF_COMMAND: RuleMetadata = RuleMetadata {
    code: "024",
    name: "def-command",
    summary: r"Do not use the \def command. Use \newcommand instead.",
    explanation: r"Do not use the \def command. Use \newcommand instead.

\def silently overwrites existing commands; \newcommand refuses to.

Bad:
    \def\foo{bar}

Good:
    \newcommand{\foo}{bar}",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static SLOPPY_COMMAND: RuleMetadata = RuleMetadata {
    code: "025",
    name: "sloppy-command",
    summary: r"Avoid the \sloppy command.",
    explanation: r"Avoid the \sloppy command.

It lets every line in the document stretch without limit. Fix the few
overfull lines by rewording or with a local sloppypar instead.

Bad:
    \sloppy

Good:
    \begin{sloppypar}
        A paragraph with a very long URL.
    \end{sloppypar}",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static OBSOLETE_COMMAND: RuleMetadata = RuleMetadata {
    code: "032",
    name: "obsolete-command",
    summary: "Avoid obsolete font and layout commands.",
    explanation: r"Avoid obsolete font and layout commands.

The two-letter font switches and \over, \centerline come from plain TeX
or LaTeX 2.09 and do not combine with other font attributes.

Bad:
    This is {\bf important}.

Good:
    This is \textbf{important}.",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

pub static OBSOLETE_PACKAGE: RuleMetadata = RuleMetadata {
    code: "033",
    name: "obsolete-package",
    summary: "Avoid obsolete packages.",
    explanation: r"Avoid obsolete packages.

Bad:
    \usepackage{epsfig}

Good:
    \usepackage{graphicx}",
    category: RuleCategory::General,
    severity: Severity::Warning,
    recommended: true,
    show_spaces: false,
};

const OBSOLETE_COMMANDS: &[(&str, &str)] = &[
    ("rm", "textrm"),
    ("tt", "texttt"),
    ("it", "textit"),
    ("bf", "textbf"),
    ("sc", "textsc"),
    ("sf", "textsf"),
    ("sl", "textsl"),
    ("over", "frac"),
    ("centerline", "centering"),
];

const OBSOLETE_PACKAGES: &[(&str, &str)] = &[
    ("a4", "the a4paper class option"),
    ("a4wide", "the a4paper class option"),
    ("t1enc", r"\usepackage[T1]{fontenc}"),
    ("umlaute", r"\usepackage[latin1]{inputenc}"),
    ("isolatin", r"\usepackage[isolatin]{inputenc}"),
    ("isolatin1", r"\usepackage[latin1]{inputenc}"),
    ("fancyheadings", "fancyhdr"),
    ("mathptm", "mathptmx"),
    ("mathpple", "mathpazo"),
    ("epsf", "graphicx"),
    ("epsfig", "graphicx"),
    ("doublespace", "setspace"),
    ("scrpage", "scrlayer-scrpage"),
];

const PACKAGE_COMMANDS: &[&str] = &["usepackage", "RequirePackage"];

pub fn rules() -> Vec<BuiltinRule> {
    let commands = Interest::none().with_commands();
    vec![
        BuiltinRule::new(&DEF_COMMAND, commands, check_def_command),
        BuiltinRule::new(&SLOPPY_COMMAND, commands, check_sloppy_command),
        BuiltinRule::new(&OBSOLETE_COMMAND, commands, check_obsolete_command),
        BuiltinRule::new(&OBSOLETE_PACKAGE, commands, check_obsolete_package),
    ]
}

pub fn check_def_command(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    commands_named(events, &["def"])
        .map(|(_, cmd)| ctx.report_span(&DEF_COMMAND, cmd.head, DEF_COMMAND.summary))
        .collect()
}

pub fn check_sloppy_command(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    commands_named(events, &["sloppy"])
        .map(|(_, cmd)| ctx.report_span(&SLOPPY_COMMAND, cmd.head, SLOPPY_COMMAND.summary))
        .collect()
}

pub fn check_obsolete_command(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let names: Vec<&str> = OBSOLETE_COMMANDS.iter().map(|(name, _)| *name).collect();
    commands_named(events, &names)
        .filter_map(|(_, cmd)| {
            let (_, replacement) = OBSOLETE_COMMANDS.iter().find(|(name, _)| *name == cmd.name)?;
            Some(ctx.report_span(
                &OBSOLETE_COMMAND,
                cmd.head,
                format!(r"Use the \{replacement} command instead."),
            ))
        })
        .collect()
}

/// Obsolete names in the package list of `\usepackage{...}`
pub fn check_obsolete_package(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (_, cmd) in commands_named(events, PACKAGE_COMMANDS) {
        let Some(list) = cmd.required_arguments().next() else {
            continue;
        };
        let inner = list.inner_span();
        let mut offset = inner.start.offset;
        for entry in inner.text(ctx.source).split(',') {
            let name = entry.trim();
            let start = offset + (entry.len() - entry.trim_start().len());
            offset += entry.len() + 1;
            if let Some((_, replacement)) = OBSOLETE_PACKAGES.iter().find(|(old, _)| *old == name) {
                diagnostics.push(ctx.report_with(
                    &OBSOLETE_PACKAGE,
                    start,
                    start + name.len(),
                    format!("Avoid obsolete packages. Use {replacement} instead."),
                ));
            }
        }
    }
    diagnostics
}
