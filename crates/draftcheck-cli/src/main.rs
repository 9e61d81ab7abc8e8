//! Draftcheck CLI
//!
//! Command-line interface for the draftcheck LaTeX style checker

mod commands;
mod output;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use draftcheck_core::{init_thread_pool, init_tracing_with};

use crate::output::RunStatus;

#[derive(Parser)]
#[command(name = "draftcheck")]
#[command(about = "Draftcheck: a style checker for LaTeX papers")]
#[command(version = draftcheck_core::VERSION)]
#[command(
    long_about = "Draftcheck finds common typographic and stylistic mistakes in LaTeX\n\
sources: citation spacing, quotes, dashes, ellipses, obsolete commands and more.\n\
\n\
Examples:\n  \
draftcheck lint paper.tex              # Lint one file\n  \
draftcheck lint --format json *.tex    # Machine-readable report\n  \
draftcheck rules --all                 # List every rule\n  \
draftcheck rules explain 004           # Show the long help of a rule\n  \
draftcheck config init                 # Write a default configuration file"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.draftcheckrc.json/draftcheck.jsonc)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint LaTeX files for style and typography mistakes
    #[command(alias = "check")]
    Lint {
        /// Files to lint
        #[arg(required = true, help = "LaTeX files to check")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text", help = "Output format for the report")]
        format: ReportFormat,
    },

    /// List and explain rules
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,

        /// Include rules that are not enabled by the current configuration
        #[arg(long, help = "List every known rule, not only the active ones")]
        all: bool,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// Show the long help of a rule
    Explain {
        /// Rule code or name
        #[arg(help = "Rule code (e.g. 004) or name (e.g. citation-spacing)")]
        rule: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default .draftcheckrc.json into the current directory
    Init {
        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ReportFormat {
    /// Context line, caret underline and message per mistake
    Text,
    /// JSON for programmatic consumption
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let use_colors =
        !cli.no_color && std::env::var("NO_COLOR").is_err() && io::stdout().is_terminal();
    colored::control::set_override(use_colors);

    let log_level = match cli.verbose {
        0 => "draftcheck=warn",
        1 => "draftcheck=debug",
        _ => "draftcheck=trace",
    };
    init_tracing_with(log_level);

    if let Some(threads) = cli.threads {
        init_thread_pool(threads);
    }

    match run_command(cli, use_colors) {
        Ok(status) => status.into(),
        Err(e) => {
            output::print_error(&e);
            RunStatus::Fatal.into()
        }
    }
}

fn run_command(cli: Cli, use_colors: bool) -> anyhow::Result<RunStatus> {
    match cli.command {
        Commands::Lint { paths, format } => {
            commands::lint_command(&paths, format, cli.config.as_deref(), use_colors)
        }
        Commands::Rules { action, all } => match action {
            None => commands::rules_list_command(all, cli.config.as_deref()),
            Some(RulesAction::Explain { rule }) => commands::rules_explain_command(&rule),
        },
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config_init_command(force),
        },
    }
}
