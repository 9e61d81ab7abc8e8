//! Positions, spans, and offset-to-line/column mapping
//!
//! Every token, node, and diagnostic carries a [`Span`] made of two
//! [`Position`]s. Positions are plain values computed from a precomputed
//! index of line starts; nothing holds a shared cursor.

use serde::{Deserialize, Serialize};

/// A location in the source text
///
/// `line` and `column` are 1-based; `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset in the source (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Advance this position over `text`, which must start at this position
    pub fn advanced_by(self, text: &str) -> Self {
        let mut next = self;
        for ch in text.chars() {
            next.offset += ch.len_utf8();
            if ch == '\n' {
                next.line += 1;
                next.column = 1;
            } else {
                next.column += 1;
            }
        }
        next
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start.offset <= end.offset);
        Self { start, end }
    }

    /// A zero-length span at `at`
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely within this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    /// Smallest span covering both `self` and `other`
    pub fn cover(&self, other: &Span) -> Span {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        Span { start, end }
    }

    /// The source text covered by this span
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }
}

/// Source map for converting byte offsets to line/column positions
///
/// Built once per file in O(n); lookups are O(log lines).
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Byte offsets of each line start (line 1 starts at offset 0)
    line_starts: Vec<usize>,
    len: usize,
}

impl SourceMap {
    /// Create a source map from source text
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (idx, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(idx + 1);
            }
        }

        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Number of lines (a trailing newline starts an empty last line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a [`Position`]
    ///
    /// Offsets past the end clamp to the end of the source.
    pub fn position(&self, offset: usize, source: &str) -> Position {
        let offset = offset.min(self.len);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };

        let line_start = self.line_starts[line_idx];
        let column = source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start)
            + 1;

        Position::new(offset, line_idx + 1, column)
    }

    /// Convert a byte range to a [`Span`]
    pub fn span(&self, start: usize, end: usize, source: &str) -> Span {
        Span::new(self.position(start, source), self.position(end.max(start), source))
    }

    /// Text of a 1-based line, without its line terminator
    pub fn line_text<'s>(&self, line: usize, source: &'s str) -> &'s str {
        let Some(&start) = line.checked_sub(1).and_then(|idx| self.line_starts.get(idx)) else {
            return "";
        };
        let end = self.line_starts.get(line).copied().unwrap_or(self.len);
        let text = source.get(start..end).unwrap_or_default();
        let text = text.strip_suffix('\n').unwrap_or(text);
        text.strip_suffix('\r').unwrap_or(text)
    }
}
