//! CLI command implementations

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, anyhow};
use colored::*;
use draftcheck_core::{
    ConfigLoader, Console, DiagnosticRenderer, FileOutcome, OutputFormat, ResultExt, RuleEngine,
    lint_paths,
};
use draftcheck_rules::{DefaultRuleEngine, RuleRegistry};
use tracing::{debug, info};

use crate::ReportFormat;
use crate::output::{self, RunStatus};

/// Lint command implementation
///
/// Every file is linted even when some fail to read; the report covers the
/// readable ones and the status is fatal if any failed.
pub fn lint_command(
    paths: &[PathBuf],
    format: ReportFormat,
    config_path: Option<&Path>,
    use_colors: bool,
) -> anyhow::Result<RunStatus> {
    debug!("Running lint command on paths: {:?}", paths);

    let config = ConfigLoader::load(config_path, paths.first().map(PathBuf::as_path))?;
    let engine = DefaultRuleEngine::from_config(&config.linter)?;
    debug!("{} rules active", engine.active_rules().len());

    let start_time = Instant::now();
    let outcomes = lint_paths(paths, &engine);

    let mut reports = Vec::with_capacity(outcomes.len());
    let mut failed = 0;
    for outcome in outcomes {
        match outcome {
            FileOutcome::Linted(report) => reports.push(report),
            FileOutcome::Failed { file, error } => {
                output::print_file_failure(&file, &error);
                failed += 1;
            }
        }
    }

    let renderer = match format {
        ReportFormat::Text => DiagnosticRenderer::with_format(OutputFormat::Text)
            .with_console(Console::with_colors(use_colors)),
        ReportFormat::Json => DiagnosticRenderer::with_format(OutputFormat::Json),
    }
    .with_widths(config.output.context_width, config.output.max_excerpt_width);

    let rendered = renderer.render_reports(&reports);
    match format {
        ReportFormat::Text => print!("{rendered}"),
        ReportFormat::Json => println!("{rendered}"),
    }

    let total: usize = reports.iter().map(|r| r.diagnostics.len()).sum();
    info!(
        "Checked {} files ({failed} failed), {total} mistakes in {:?}",
        paths.len(),
        start_time.elapsed()
    );

    Ok(if failed > 0 {
        RunStatus::Fatal
    } else if total > 0 {
        RunStatus::Violations
    } else {
        RunStatus::Clean
    })
}

/// Rules list command implementation
///
/// A broken configuration is logged and the defaults are listed.
pub fn rules_list_command(all: bool, config_path: Option<&Path>) -> anyhow::Result<RunStatus> {
    let config = ConfigLoader::load(config_path, None)
        .log_and_continue("Loading configuration")
        .unwrap_or_default();
    let engine = DefaultRuleEngine::from_config(&config.linter)
        .log_and_continue("Resolving rules")
        .unwrap_or_default();
    let active: Vec<&str> = engine.active_rules().iter().map(|m| m.code).collect();

    let registry = RuleRegistry::global();
    let listed: Vec<_> = registry
        .metadata()
        .map(|metadata| (metadata, active.contains(&metadata.code)))
        .filter(|(_, is_active)| all || *is_active)
        .collect();

    debug!("Listing {} of {} rules", listed.len(), registry.len());
    output::print_rule_table(listed, all);
    Ok(RunStatus::Clean)
}

/// Rules explain command implementation
pub fn rules_explain_command(rule: &str) -> anyhow::Result<RunStatus> {
    let found = RuleRegistry::global().get(rule).ok_or_else(|| {
        anyhow!("Unknown rule '{rule}'. Use 'draftcheck rules --all' to list every rule.")
    })?;
    output::print_rule_explanation(found.metadata());
    Ok(RunStatus::Clean)
}

/// Config init command implementation
pub fn config_init_command(force: bool) -> anyhow::Result<RunStatus> {
    let dir = std::env::current_dir().context("Cannot determine the current directory")?;
    let path = ConfigLoader::write_default(&dir, force)?;
    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        path.display()
    );
    println!("  Edit \"linter.rules\" to enable, disable or re-level rules.");
    Ok(RunStatus::Clean)
}
