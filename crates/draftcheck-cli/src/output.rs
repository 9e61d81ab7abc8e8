//! Terminal output for the CLI: run status, rule listings and error messages
//!
//! Lint reports themselves are rendered by `draftcheck_core::DiagnosticRenderer`.

use std::path::Path;
use std::process::ExitCode;

use colored::*;
use draftcheck_core::{DraftcheckError, RuleMetadata, Severity};

/// Overall result of a run, mapped onto the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Nothing to report
    Clean,
    /// At least one diagnostic
    Violations,
    /// A file could not be read or decoded, or the configuration is invalid
    Fatal,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::Violations => 1,
            RunStatus::Fatal => 2,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Print a top-level failure to stderr
pub fn print_error(error: &anyhow::Error) {
    eprintln!("{} {error:#}", "error:".red().bold());
}

/// Print a file that could not be linted to stderr
pub fn print_file_failure(file: &Path, error: &DraftcheckError) {
    eprintln!(
        "{} {}: {error}",
        "error:".red().bold(),
        file.display().to_string().bold()
    );
}

/// Severity name padded to `width`, colored by level
fn severity_label(severity: Severity, width: usize) -> ColoredString {
    let label = format!("{:<width$}", severity.to_string());
    match severity {
        Severity::Error => label.red(),
        Severity::Warning => label.yellow(),
        Severity::Info => label.blue(),
        Severity::Hint => label.cyan(),
    }
}

/// One line per rule: code, name, default severity, summary
///
/// `active` marks rules enabled by the current configuration when listing
/// every rule.
pub fn print_rule_table<'a>(
    rules: impl IntoIterator<Item = (&'a RuleMetadata, bool)>,
    show_active: bool,
) {
    let mut count = 0;
    for (metadata, active) in rules {
        let marker = match (show_active, active) {
            (false, _) => "",
            (true, true) => "* ",
            (true, false) => "  ",
        };
        println!(
            "{marker}{} {:<30} {} {}",
            metadata.code.bold(),
            metadata.name,
            severity_label(metadata.severity, 7),
            metadata.summary.dimmed()
        );
        count += 1;
    }

    println!();
    if show_active {
        println!("{count} rules (* = enabled by the current configuration)");
    } else {
        println!("{count} rules enabled");
    }
}

/// Header and long help of one rule
pub fn print_rule_explanation(metadata: &RuleMetadata) {
    let title = format!("[{}] {}", metadata.code, metadata.name);
    println!("{}", title.bold());
    println!("{}", "=".repeat(title.chars().count()));
    println!();
    println!("Category: {}", metadata.category.slug());
    println!("Default severity: {}", severity_label(metadata.severity, 0));
    println!(
        "Recommended: {}",
        if metadata.recommended { "yes" } else { "no" }
    );
    println!();
    println!("{}", metadata.explanation);
}
