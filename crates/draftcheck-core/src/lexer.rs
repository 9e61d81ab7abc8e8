//! Lossless LaTeX tokenizer
//!
//! Converts raw source into a flat, ordered stream of positioned tokens in a
//! single left-to-right pass. Concatenating every token's `text` reproduces
//! the input exactly, and the tokenizer never fails: truncated constructs are
//! closed implicitly at end of input.
//!
//! Mode tracking is limited to what the lexical layer needs:
//! - math delimiters (`$`, `$$`, `\[ \]`, `\( \)`) tag enclosed tokens with `math`
//! - inside a verbatim-like environment body, `%` and math delimiters are plain
//!   text so that nothing in the body can leak mode state past `\end{...}`

use serde::Serialize;

use crate::source_map::{Position, Span};

/// Environments whose body is literal text
pub const VERBATIM_ENVIRONMENTS: &[&str] = &[
    "verbatim",
    "verbatim*",
    "Verbatim",
    "lstlisting",
    "minted",
    "comment",
];

/// Whether `name` is a verbatim-like environment
pub fn is_verbatim_environment(name: &str) -> bool {
    VERBATIM_ENVIRONMENTS.iter().any(|env| *env == name)
}

/// Token kinds produced by [`tokenize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Command,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    BeginEnv,
    EndEnv,
    MathOpen,
    MathClose,
    Comment,
    TextRun,
    Whitespace,
    Newline,
}

/// A positioned slice of the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Literal source text of the token
    pub text: &'a str,
    pub span: Span,
    /// True for tokens strictly inside a math region (delimiters excluded)
    pub math: bool,
}

impl<'a> Token<'a> {
    /// Command name (text after the backslash) or environment name
    pub fn name(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::Command => command_name(self.text),
            TokenKind::BeginEnv | TokenKind::EndEnv => environment_name(self.text),
            _ => None,
        }
    }

    /// Whether this math delimiter opens or closes display math
    pub fn is_display_math(&self) -> bool {
        matches!(self.text, "$$" | "\\[" | "\\]")
    }

    /// Whether this token only separates words
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Newline)
    }
}

/// Name of a command given its literal text
///
/// The name is the maximal run of letters after the backslash, or a single
/// control-symbol character when no letter follows.
pub fn command_name(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('\\')?;
    let letters = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if letters > 0 {
        return Some(&rest[..letters]);
    }
    match rest.chars().next() {
        Some(symbol) => Some(&rest[..symbol.len_utf8()]),
        None => Some(""),
    }
}

fn environment_name(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    text.get(open + 1..close)
}

/// Tokenize LaTeX source text
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source);
    lexer.run();
    lexer.tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MathDelimiter {
    Dollar,
    DoubleDollar,
    Bracket,
    Paren,
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    position: Position,
    math: Option<MathDelimiter>,
    /// Brace depth inside the current math region
    math_depth: usize,
    /// Depth of the innermost `\text{}`-like argument inside math, where `$` is literal
    text_floor: Option<usize>,
    /// A text command was just seen inside math and its `{` has not come yet
    text_pending: bool,
    verbatim: Option<&'a str>,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            position: Position::default(),
            math: None,
            math_depth: 0,
            text_floor: None,
            text_pending: false,
            verbatim: None,
            tokens: Vec::with_capacity(source.len() / 4),
        }
    }

    fn run(&mut self) {
        while let Some(ch) = self.source[self.pos..].chars().next() {
            match ch {
                '\\' => self.lex_backslash(),
                '%' if self.verbatim.is_none() => {
                    let len = comment_len(&self.source[self.pos..]);
                    self.emit(TokenKind::Comment, len);
                }
                '$' if self.verbatim.is_none() => self.lex_dollar(),
                '{' => self.lex_open_brace(),
                '}' => self.lex_close_brace(),
                '[' => self.emit(TokenKind::OpenBracket, 1),
                ']' => self.emit(TokenKind::CloseBracket, 1),
                '\n' => self.emit(TokenKind::Newline, 1),
                '\r' if self.source[self.pos..].starts_with("\r\n") => {
                    self.emit(TokenKind::Newline, 2)
                }
                c if c.is_whitespace() => {
                    let len = whitespace_len(&self.source[self.pos..]);
                    self.emit(TokenKind::Whitespace, len);
                }
                _ => {
                    let len = self.text_len(&self.source[self.pos..]);
                    self.text_pending = false;
                    self.emit(TokenKind::TextRun, len);
                }
            }
        }

        if self.math.is_some() {
            self.emit(TokenKind::MathClose, 0);
            self.set_math(None);
        }
    }

    fn set_math(&mut self, mode: Option<MathDelimiter>) {
        self.math = mode;
        self.math_depth = 0;
        self.text_floor = None;
        self.text_pending = false;
    }

    fn lex_open_brace(&mut self) {
        if self.math.is_some() {
            self.math_depth += 1;
            if std::mem::take(&mut self.text_pending) && self.text_floor.is_none() {
                self.text_floor = Some(self.math_depth);
            }
        }
        self.emit(TokenKind::OpenBrace, 1);
    }

    fn lex_close_brace(&mut self) {
        if self.math.is_some() {
            if self.text_floor == Some(self.math_depth) {
                self.text_floor = None;
            }
            self.math_depth = self.math_depth.saturating_sub(1);
            self.text_pending = false;
        }
        self.emit(TokenKind::CloseBrace, 1);
    }

    fn emit(&mut self, kind: TokenKind, len: usize) {
        let text = &self.source[self.pos..self.pos + len];
        let end = self.position.advanced_by(text);
        let math =
            self.math.is_some() && !matches!(kind, TokenKind::MathOpen | TokenKind::MathClose);
        self.tokens.push(Token {
            kind,
            text,
            span: Span::new(self.position, end),
            math,
        });
        self.pos += len;
        self.position = end;
    }

    fn lex_backslash(&mut self) {
        let rest = &self.source[self.pos..];

        if let Some((len, name)) = environment_marker(rest, "\\begin") {
            self.emit(TokenKind::BeginEnv, len);
            if self.verbatim.is_none() && self.math.is_none() && is_verbatim_environment(name) {
                self.verbatim = Some(name);
            }
            return;
        }
        if let Some((len, name)) = environment_marker(rest, "\\end") {
            self.emit(TokenKind::EndEnv, len);
            if self.verbatim == Some(name) {
                self.verbatim = None;
            }
            return;
        }

        let after = &rest[1..];
        let letters = after
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(after.len());
        if letters > 0 {
            if &after[..letters] == "verb"
                && self.verbatim.is_none()
                && let Some(len) = verb_len(rest)
            {
                self.emit(TokenKind::Command, len);
                return;
            }
            self.text_pending = self.math.is_some() && is_text_command(&after[..letters]);
            self.emit(TokenKind::Command, 1 + letters);
            return;
        }

        let Some(symbol) = after.chars().next() else {
            // Lone backslash at end of input
            self.emit(TokenKind::Command, 1);
            return;
        };

        if self.verbatim.is_none() {
            let delimiter = match (symbol, self.math) {
                ('[', None) => Some((TokenKind::MathOpen, Some(MathDelimiter::Bracket))),
                (']', Some(MathDelimiter::Bracket)) => Some((TokenKind::MathClose, None)),
                ('(', None) => Some((TokenKind::MathOpen, Some(MathDelimiter::Paren))),
                (')', Some(MathDelimiter::Paren)) => Some((TokenKind::MathClose, None)),
                _ => None,
            };
            if let Some((kind, next_mode)) = delimiter {
                self.emit(kind, 2);
                self.set_math(next_mode);
                return;
            }
        }

        self.text_pending = false;
        self.emit(TokenKind::Command, 1 + symbol.len_utf8());
    }

    fn lex_dollar(&mut self) {
        let double = self.source[self.pos..].starts_with("$$");
        if self.text_floor.is_some() {
            // Nested math inside `\text{}` stays part of the argument
            self.emit(TokenKind::TextRun, 1);
            return;
        }
        match self.math {
            None if double => {
                self.emit(TokenKind::MathOpen, 2);
                self.set_math(Some(MathDelimiter::DoubleDollar));
            }
            None => {
                self.emit(TokenKind::MathOpen, 1);
                self.set_math(Some(MathDelimiter::Dollar));
            }
            Some(MathDelimiter::DoubleDollar) if double => {
                self.emit(TokenKind::MathClose, 2);
                self.set_math(None);
            }
            Some(MathDelimiter::Dollar) => {
                self.emit(TokenKind::MathClose, 1);
                self.set_math(None);
            }
            // A lone `$` inside display math does not close it
            Some(_) => self.emit(TokenKind::TextRun, 1),
        }
    }

    fn text_len(&self, rest: &str) -> usize {
        let in_verbatim = self.verbatim.is_some();
        let len = rest
            .char_indices()
            .find(|&(_, c)| {
                matches!(c, '\\' | '{' | '}' | '[' | ']')
                    || c.is_whitespace()
                    || (!in_verbatim && matches!(c, '%' | '$'))
            })
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        // Always make progress, even on a character the match above rejected
        len.max(rest.chars().next().map_or(0, char::len_utf8))
    }
}

/// Commands whose argument is typeset as text even inside math
fn is_text_command(name: &str) -> bool {
    matches!(
        name,
        "text" | "mbox" | "hbox" | "textrm" | "textnormal" | "textit" | "textbf" | "textsf"
            | "texttt" | "textup"
    )
}

/// Length of a comment starting at `%`, excluding the line terminator
fn comment_len(rest: &str) -> usize {
    match rest.find('\n') {
        Some(end) if rest[..end].ends_with('\r') => end - 1,
        Some(end) => end,
        None => rest.len(),
    }
}

/// Length of a run of non-newline whitespace
fn whitespace_len(rest: &str) -> usize {
    let mut chars = rest.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        let crlf = c == '\r' && matches!(chars.peek(), Some((_, '\n')));
        if c == '\n' || crlf || !c.is_whitespace() {
            return idx.max(1);
        }
    }
    rest.len()
}

/// Match `\begin{name}` / `\end{name}` at the start of `rest`
fn environment_marker<'a>(rest: &'a str, keyword: &str) -> Option<(usize, &'a str)> {
    let after = rest.strip_prefix(keyword)?.strip_prefix('{')?;
    let close = after.find(|c: char| matches!(c, '}' | '{' | '\\' | '\n' | '%'))?;
    if close == 0 || !after[close..].starts_with('}') {
        return None;
    }
    let name = &after[..close];
    Some((keyword.len() + 1 + close + 1, name))
}

/// Length of `\verb<d>...<d>` (or `\verb*`) when the delimiter is closed on the same line
fn verb_len(rest: &str) -> Option<usize> {
    let mut idx = "\\verb".len();
    if rest[idx..].starts_with('*') {
        idx += 1;
    }
    let delimiter = rest[idx..].chars().next()?;
    if delimiter.is_whitespace() || delimiter.is_ascii_alphabetic() {
        return None;
    }
    let body_start = idx + delimiter.len_utf8();
    let body = &rest[body_start..];
    let close = body.find(|c: char| c == delimiter || c == '\n')?;
    if !body[close..].starts_with(delimiter) {
        return None;
    }
    Some(body_start + close + delimiter.len_utf8())
}
