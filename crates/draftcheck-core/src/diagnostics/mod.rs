//! Diagnostics model and text/JSON reporter

mod renderer;
mod types;

pub use renderer::{DiagnosticRenderer, OutputFormat, summary_line};
pub use types::{Diagnostic, FileReport, Severity, sort_by_location};
