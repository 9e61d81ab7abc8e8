//! Draftcheck Core
//!
//! Core linting engine for LaTeX documents.
//! This crate provides the tokenizer, the structural document builder,
//! the walker that feeds rules, and the diagnostic model and reporter.
//! Concrete style rules live in `draftcheck-rules`.

pub mod config;
pub mod console; // Terminal console utilities for rich output
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod result;
pub mod rules;
pub mod source_map;
pub mod walk;

// Configuration system
pub use config::{
    ConfigLoader, DraftcheckConfiguration, LinterConfiguration, OutputConfiguration, RuleSeverity,
};
// Console utilities for rich terminal output
pub use console::{Color, Console};
pub use diagnostics::{
    Diagnostic, DiagnosticRenderer, FileReport, OutputFormat, Severity, sort_by_location,
    summary_line,
};
pub use document::{
    Command, Comment, Document, Environment, Group, GroupDelimiter, MathSpan, Node, TextRun,
    build_document,
};
pub use error::{DraftcheckError, ErrorKind};
pub use executor::{FileOutcome, init_thread_pool, lint_path, lint_paths, lint_source, read_source};
pub use lexer::{Token, TokenKind, tokenize};
pub use result::{Result, ResultExt};
pub use rules::{LintContext, Rule, RuleCategory, RuleEngine, RuleMetadata};
pub use source_map::{Position, SourceMap, Span};
pub use walk::{Event, EventKind, Interest, Scope, Visit, is_math_environment, walk};

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr so that report output on stdout stays machine-readable.
pub fn init_tracing() {
    init_tracing_with("draftcheck=warn");
}

/// Initialize tracing with an explicit fallback filter, used when `RUST_LOG` is unset
pub fn init_tracing_with(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second initialization (tests, embedding) is not an error worth surfacing
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
