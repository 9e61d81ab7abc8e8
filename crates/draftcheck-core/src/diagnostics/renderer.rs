//! Diagnostic renderer for the text and JSON reports
//!
//! Text layout, one block per diagnostic:
//!
//! ```text
//! paper.tex:12:18: ...e shown in \cite{lamport94} and la...
//!                              ^
//! 	[004] Use a non-breaking space (~) before a citation.
//! ```

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::{Diagnostic, FileReport, Severity};
use crate::console::{Color, Console};
use crate::source_map::SourceMap;

const ELLIPSIS: &str = "...";

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Context line, caret underline and message
    #[default]
    Text,
    /// Pretty-printed JSON for programmatic consumption
    Json,
}

/// Diagnostic renderer
#[derive(Debug, Clone)]
pub struct DiagnosticRenderer {
    console: Console,
    format: OutputFormat,
    /// Characters of context shown on each side of the excerpt
    context_width: usize,
    /// Excerpts longer than this are clipped
    max_excerpt_width: usize,
}

/// Flat JSON view of a diagnostic
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDiagnostic<'a> {
    code: &'a str,
    name: &'a str,
    severity: Severity,
    message: &'a str,
    line: usize,
    column: usize,
    end_line: usize,
    end_column: usize,
    excerpt: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonFileReport<'a> {
    file: &'a str,
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    files: Vec<JsonFileReport<'a>>,
    total: usize,
}

/// `Total of <N> mistakes found.`
pub fn summary_line(total: usize) -> String {
    format!("Total of {total} mistakes found.")
}

impl DiagnosticRenderer {
    /// Create a text renderer with automatic terminal detection
    pub fn new() -> Self {
        Self {
            console: Console::new(),
            format: OutputFormat::Text,
            context_width: 10,
            max_excerpt_width: 40,
        }
    }

    /// Create a renderer with colors disabled
    pub fn no_colors() -> Self {
        Self {
            console: Console::no_colors(),
            ..Self::new()
        }
    }

    /// Create a renderer for `format`; JSON output is never colored
    pub fn with_format(format: OutputFormat) -> Self {
        let console = match format {
            OutputFormat::Json => Console::no_colors(),
            OutputFormat::Text => Console::new(),
        };
        Self {
            console,
            format,
            ..Self::new()
        }
    }

    pub fn with_console(mut self, console: Console) -> Self {
        if self.format == OutputFormat::Text {
            self.console = console;
        }
        self
    }

    /// Set the context and excerpt widths (in characters)
    pub fn with_widths(mut self, context_width: usize, max_excerpt_width: usize) -> Self {
        self.context_width = context_width;
        self.max_excerpt_width = max_excerpt_width.max(1);
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render every report followed by the run-wide summary
    pub fn render_reports(&self, reports: &[FileReport]) -> String {
        let total = reports.iter().map(|r| r.diagnostics.len()).sum();
        match self.format {
            OutputFormat::Text => {
                let mut output = String::new();
                for report in reports {
                    output.push_str(&self.render_report(report));
                }
                output.push_str(&summary_line(total));
                output.push('\n');
                output
            }
            OutputFormat::Json => self.render_json(reports, total),
        }
    }

    /// Render all diagnostic blocks of one file (no summary)
    pub fn render_report(&self, report: &FileReport) -> String {
        let map = SourceMap::new(&report.source);
        let mut output = String::new();
        for diagnostic in &report.diagnostics {
            output.push_str(&self.render_diagnostic(
                &report.file,
                &report.source,
                &map,
                diagnostic,
            ));
        }
        output
    }

    /// Render one diagnostic block, including its trailing blank line
    pub fn render_diagnostic(
        &self,
        file: &str,
        source: &str,
        map: &SourceMap,
        diagnostic: &Diagnostic,
    ) -> String {
        let start = diagnostic.span.start;
        let prefix = format!("{file}:{}:{}: ", start.line, start.column);

        let line: Vec<char> = map.line_text(start.line, source).chars().collect();
        let column = start.column.saturating_sub(1).min(line.len());

        // Only the first line of a multi-line match is underlined
        let matched = diagnostic.span.text(source);
        let matched = matched.split('\n').next().unwrap_or_default();
        let matched = matched.strip_suffix('\r').unwrap_or(matched);
        let excerpt_len = matched
            .chars()
            .count()
            .min(line.len() - column)
            .min(self.max_excerpt_width);

        let left = &line[..column];
        let excerpt = &line[column..column + excerpt_len];
        let right = &line[column + excerpt_len..];

        let left_start = left.len().saturating_sub(self.context_width);
        let right_end = right.len().min(self.context_width);

        let mut before = String::new();
        if left_start > 0 {
            before.push_str(ELLIPSIS);
        }
        before.push_str(&self.clean(&left[left_start..], diagnostic.show_spaces));
        let excerpt = self.clean(excerpt, diagnostic.show_spaces);
        let mut after = self.clean(&right[..right_end], diagnostic.show_spaces);
        if right_end < right.len() {
            after.push_str(ELLIPSIS);
        }

        let padding = prefix.width() + before.width();
        let carets = "^".repeat(excerpt.width().max(1));

        let mut output = String::new();
        output.push_str(&prefix);
        output.push_str(&before);
        output.push_str(&excerpt);
        output.push_str(&after);
        output.push('\n');
        output.push_str(&" ".repeat(padding));
        output.push_str(&self.console.colorize(&carets, Color::Red));
        output.push('\n');
        output.push('\t');
        output.push_str(
            &self
                .console
                .colorize(&format!("[{}]", diagnostic.code), Color::Dim),
        );
        output.push(' ');
        output.push_str(&diagnostic.message);
        output.push_str("\n\n");
        output
    }

    /// Tabs render as one space; optionally make spaces visible
    fn clean(&self, chars: &[char], show_spaces: bool) -> String {
        chars
            .iter()
            .map(|&c| match c {
                '\t' | ' ' if show_spaces => '_',
                '\t' => ' ',
                c => c,
            })
            .collect()
    }

    fn render_json(&self, reports: &[FileReport], total: usize) -> String {
        let files = reports
            .iter()
            .map(|report| JsonFileReport {
                file: &report.file,
                diagnostics: report
                    .diagnostics
                    .iter()
                    .map(|d| JsonDiagnostic {
                        code: &d.code,
                        name: &d.name,
                        severity: d.severity,
                        message: &d.message,
                        line: d.span.start.line,
                        column: d.span.start.column,
                        end_line: d.span.end.line,
                        end_column: d.span.end.column,
                        excerpt: d.excerpt.as_deref(),
                    })
                    .collect(),
            })
            .collect();

        serde_json::to_string_pretty(&JsonReport { files, total })
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }
}

impl Default for DiagnosticRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(source: &str, start: usize, end: usize, code: &str) -> FileReport {
        let map = SourceMap::new(source);
        let span = map.span(start, end, source);
        let mut report = FileReport::new("paper.tex", source);
        report.diagnostics.push(
            Diagnostic::new(code, Severity::Warning, "Message here.", span)
                .with_excerpt(span.text(source)),
        );
        report
    }

    #[test]
    fn test_short_line_has_no_ellipsis() {
        let source = "see http://x.org now";
        let output = DiagnosticRenderer::no_colors().render_report(&report(source, 4, 16, "030"));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "paper.tex:1:5: see http://x.org now");
        assert_eq!(lines[1], format!("{}{}", " ".repeat(19), "^".repeat(12)));
        assert_eq!(lines[2], "\t[030] Message here.");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_long_line_is_truncated_and_carets_stay_aligned() {
        let source = "aaaaaaaaaaaaaaaaaaaa MATCH bbbbbbbbbbbbbbbbbbbb";
        let output = DiagnosticRenderer::no_colors().render_report(&report(source, 21, 26, "011"));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "paper.tex:1:22: ...aaaaaaaaa MATCH bbbbbbbbb...");

        let caret_col = lines[1].find('^').unwrap();
        assert_eq!(&lines[0][caret_col..caret_col + 5], "MATCH");
        assert_eq!(lines[1].trim(), "^^^^^");
    }

    #[test]
    fn test_zero_length_span_gets_one_caret() {
        let source = "abc";
        let output = DiagnosticRenderer::no_colors().render_report(&report(source, 3, 3, "901"));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "paper.tex:1:4: abc");
        assert_eq!(lines[1], format!("{}^", " ".repeat(18)));
    }

    #[test]
    fn test_excerpt_is_clipped_to_first_line_and_max_width() {
        let source = "x \\begin{a}\nbody\n";
        let output = DiagnosticRenderer::no_colors()
            .with_widths(10, 4)
            .render_report(&report(source, 2, 17, "901"));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "paper.tex:1:3: x \\begin{a}");
        assert_eq!(lines[1].trim(), "^^^^");
    }

    #[test]
    fn test_show_spaces_and_tabs() {
        let source = "word\t ,";
        let mut report = report(source, 4, 6, "007");
        report.diagnostics[0].show_spaces = true;
        let output = DiagnosticRenderer::no_colors().render_report(&report);
        assert!(output.starts_with("paper.tex:1:5: word__,\n"));
    }

    #[test]
    fn test_wide_characters_shift_carets() {
        let source = "日本 x";
        let output = DiagnosticRenderer::no_colors().render_report(&report(source, 7, 8, "011"));
        let lines: Vec<_> = output.lines().collect();
        // Prefix is 15 columns, the two CJK characters take four
        assert_eq!(lines[1], format!("{}^", " ".repeat(15 + 5)));
    }

    #[test]
    fn test_colors_do_not_change_padding() {
        let source = "a b";
        let colored = DiagnosticRenderer::no_colors()
            .with_console(Console::with_colors(true))
            .render_report(&report(source, 2, 3, "011"));
        let plain = DiagnosticRenderer::no_colors().render_report(&report(source, 2, 3, "011"));
        let colored_pad = colored.lines().nth(1).unwrap().find('\x1b').unwrap();
        let plain_pad = plain.lines().nth(1).unwrap().find('^').unwrap();
        assert_eq!(colored_pad, plain_pad);
        assert!(colored.contains("\x1b[31m^\x1b[0m"));
    }

    #[test]
    fn test_summary_for_clean_run() {
        let output =
            DiagnosticRenderer::no_colors().render_reports(&[FileReport::new("a.tex", "")]);
        assert_eq!(output, "Total of 0 mistakes found.\n");
    }

    #[test]
    fn test_json_report() {
        let renderer = DiagnosticRenderer::with_format(OutputFormat::Json);
        let output = renderer.render_reports(&[report("see http://x.org", 4, 16, "030")]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total"], 1);
        let diagnostic = &parsed["files"][0]["diagnostics"][0];
        assert_eq!(diagnostic["code"], "030");
        assert_eq!(diagnostic["severity"], "warning");
        assert_eq!(diagnostic["line"], 1);
        assert_eq!(diagnostic["column"], 5);
        assert_eq!(diagnostic["endColumn"], 17);
        assert_eq!(diagnostic["excerpt"], "http://x.org");
    }
}
