//! Structural document model
//!
//! The document is an owned tree: every node's span lies within its parent's
//! span, and siblings are source-ordered and non-overlapping. Text is borrowed
//! from the source, so a [`Document`] never outlives the text it was built from.

mod builder;

pub use builder::{BuildOutput, DocumentBuilder, build_document, structure};

use crate::source_map::Span;

/// Root of the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    pub source: &'a str,
    pub span: Span,
    pub children: Vec<Node<'a>>,
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    Environment(Environment<'a>),
    Command(Command<'a>),
    Group(Group<'a>),
    Text(TextRun<'a>),
    Math(MathSpan<'a>),
    Comment(Comment<'a>),
}

/// `\begin{name} ... \end{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment<'a> {
    pub name: &'a str,
    /// Span of the `\begin{name}` marker
    pub begin: Span,
    /// Span of the `\end{name}` marker, absent when the environment was closed implicitly
    pub end: Option<Span>,
    pub children: Vec<Node<'a>>,
    pub span: Span,
    /// Body is a single opaque text run
    pub verbatim: bool,
}

/// A command with its attached arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    pub name: &'a str,
    /// Span of the command token itself (`\cite`)
    pub head: Span,
    /// Bracket (optional) and brace (required) arguments in source order
    pub arguments: Vec<Group<'a>>,
    /// Head plus all arguments
    pub span: Span,
}

/// Delimiter of a [`Group`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupDelimiter {
    /// `{ ... }`: required argument or plain grouping
    Brace,
    /// `[ ... ]`: optional argument
    Bracket,
}

/// A delimited group: a command argument or a bare `{...}` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a> {
    pub delimiter: GroupDelimiter,
    pub children: Vec<Node<'a>>,
    pub span: Span,
    /// False when the group was closed implicitly
    pub closed: bool,
}

/// Contiguous text, whitespace, and newlines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// Inline or display math
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpan<'a> {
    pub display: bool,
    /// Span of the opening delimiter
    pub open: Span,
    /// Span of the closing delimiter, absent when math ran to end of input
    pub close: Option<Span>,
    pub children: Vec<Node<'a>>,
    pub span: Span,
}

/// `% ...` up to (not including) the end of line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment<'a> {
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Node<'a> {
    pub fn span(&self) -> Span {
        match self {
            Node::Environment(env) => env.span,
            Node::Command(cmd) => cmd.span,
            Node::Group(group) => group.span,
            Node::Text(text) => text.span,
            Node::Math(math) => math.span,
            Node::Comment(comment) => comment.span,
        }
    }

    /// Direct children (command arguments are reached through [`Command::arguments`])
    pub fn children(&self) -> &[Node<'a>] {
        match self {
            Node::Environment(env) => &env.children,
            Node::Group(group) => &group.children,
            Node::Math(math) => &math.children,
            Node::Command(_) | Node::Text(_) | Node::Comment(_) => &[],
        }
    }

    pub fn as_text(&self) -> Option<&TextRun<'a>> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&Command<'a>> {
        match self {
            Node::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// Whether this is a command whose name is one of `names`
    pub fn is_command_in(&self, names: &[&str]) -> bool {
        self.as_command().is_some_and(|cmd| names.iter().any(|n| *n == cmd.name))
    }

    /// Short label used in debug output and tests
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Environment(_) => "environment",
            Node::Command(_) => "command",
            Node::Group(_) => "group",
            Node::Text(_) => "text",
            Node::Math(_) => "math",
            Node::Comment(_) => "comment",
        }
    }
}

impl<'a> Command<'a> {
    /// Brace-delimited arguments
    pub fn required_arguments(&self) -> impl Iterator<Item = &Group<'a>> {
        self.arguments
            .iter()
            .filter(|arg| arg.delimiter == GroupDelimiter::Brace)
    }

    /// Bracket-delimited arguments
    pub fn optional_arguments(&self) -> impl Iterator<Item = &Group<'a>> {
        self.arguments
            .iter()
            .filter(|arg| arg.delimiter == GroupDelimiter::Bracket)
    }
}

impl<'a> Group<'a> {
    /// Span of the content between the delimiters
    pub fn inner_span(&self) -> Span {
        let mut inner = self.span;
        inner.start = inner.start.advanced_by(match self.delimiter {
            GroupDelimiter::Brace => "{",
            GroupDelimiter::Bracket => "[",
        });
        if self.closed && inner.end.offset > inner.start.offset {
            // Closing delimiters are single ASCII characters on the same line
            inner.end.offset -= 1;
            inner.end.column = inner.end.column.saturating_sub(1).max(1);
        }
        inner
    }

    /// Raw source text between the delimiters
    pub fn inner_text(&self, source: &'a str) -> &'a str {
        self.inner_span().text(source)
    }
}

impl<'a> Document<'a> {
    /// Visit every node depth-first in source order, arguments included
    pub fn for_each_node(&self, mut visit: impl FnMut(&Node<'a>)) {
        let mut pending: Vec<&Node<'a>> = self.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            visit(node);
            if let Node::Command(cmd) = node {
                for arg in cmd.arguments.iter().rev() {
                    pending.extend(arg.children.iter().rev());
                }
            }
            pending.extend(node.children().iter().rev());
        }
    }
}
