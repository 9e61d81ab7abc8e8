//! Colour handling for the text report
//!
//! Escapes wrap text that is already aligned, so switching colour on never
//! moves a caret.

use std::env;
use std::io::{self, IsTerminal};

/// Whether report output may carry ANSI colour
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    color_enabled: bool,
}

/// The styles the report uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Caret underline
    Red,
    /// `[code]` label
    Dim,
}

impl Color {
    fn sgr(self) -> &'static str {
        match self {
            Color::Red => "31",
            Color::Dim => "2",
        }
    }
}

impl Console {
    /// Colour when stdout is a terminal and `NO_COLOR` is unset
    pub fn new() -> Self {
        Self::with_colors(io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none())
    }

    pub fn no_colors() -> Self {
        Self::with_colors(false)
    }

    pub fn with_colors(enabled: bool) -> Self {
        Self {
            color_enabled: enabled,
        }
    }

    pub fn is_color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Wrap `text` in the escape for `color`; empty text stays empty
    pub fn colorize(&self, text: &str, color: Color) -> String {
        if self.color_enabled && !text.is_empty() {
            format!("\x1b[{}m{text}\x1b[0m", color.sgr())
        } else {
            text.to_string()
        }
    }
}
