//! Stack-based document builder with error recovery
//!
//! Each token is one state transition `(stack, token) -> (stack, diagnostics, tree delta)`.
//! Unbalanced input never aborts the build; it is repaired in place and
//! reported as a structural diagnostic:
//!
//! - a mismatched `\end{name}` closes the nearest open `name` environment,
//!   implicitly closing everything opened after it
//! - an `\end{name}` with no open `name` is kept as a plain `end` command
//! - a stray `}` is kept as text
//! - anything still open at end of input is closed there
//!
//! Math regions act as barriers: a `}` or `\end` inside math never closes a
//! construct opened outside it, because the tokenizer already fixed where math
//! ends.

use crate::diagnostics::{Diagnostic, Severity};
use crate::lexer::{Token, TokenKind, is_verbatim_environment};
use crate::rules::{RuleCategory, RuleMetadata};
use crate::source_map::{Position, Span};

use super::{
    Command, Comment, Document, Environment, Group, GroupDelimiter, MathSpan, Node, TextRun,
};

/// Metadata for the structural diagnostics the builder emits
pub mod structure {
    use super::*;

    const fn structural(
        code: &'static str,
        name: &'static str,
        summary: &'static str,
        explanation: &'static str,
    ) -> RuleMetadata {
        RuleMetadata {
            code,
            name,
            summary,
            explanation,
            category: RuleCategory::Structure,
            severity: Severity::Error,
            recommended: true,
            show_spaces: false,
        }
    }

    pub const IMPLICITLY_CLOSED_ENVIRONMENT: RuleMetadata = structural(
        "900",
        "implicitly-closed-environment",
        "Environment closed implicitly by a crossing end marker.",
        "An environment was still open when an enclosing construct ended.\n\n\
         Bad:\n    \\begin{itemize}\\begin{enumerate}\\end{itemize}\n\n\
         Good:\n    \\begin{itemize}\\begin{enumerate}\\end{enumerate}\\end{itemize}",
    );

    pub const UNCLOSED_ENVIRONMENT: RuleMetadata = structural(
        "901",
        "unclosed-environment",
        "Environment is never closed.",
        "Every \\begin{name} needs a matching \\end{name} before the end of the document.",
    );

    pub const UNMATCHED_END: RuleMetadata = structural(
        "902",
        "unmatched-end",
        "End marker without a matching begin.",
        "An \\end{name} appears where no `name` environment is open.",
    );

    pub const UNCLOSED_GROUP: RuleMetadata = structural(
        "903",
        "unclosed-group",
        "Brace group is never closed.",
        "An opening brace has no matching closing brace in the same context.",
    );

    pub const UNMATCHED_BRACE: RuleMetadata = structural(
        "904",
        "unmatched-brace",
        "Closing brace without a matching opening brace.",
        "A closing brace appears where no group is open.",
    );

    pub const UNCLOSED_MATH: RuleMetadata = structural(
        "905",
        "unclosed-math",
        "Math mode is never closed.",
        "A math delimiter ($, $$, \\[ or \\() has no closing counterpart.",
    );

    /// All structural diagnostics, ordered by code
    pub const ALL: [&RuleMetadata; 6] = [
        &IMPLICITLY_CLOSED_ENVIRONMENT,
        &UNCLOSED_ENVIRONMENT,
        &UNMATCHED_END,
        &UNCLOSED_GROUP,
        &UNMATCHED_BRACE,
        &UNCLOSED_MATH,
    ];
}

/// Result of building a document
#[derive(Debug, Clone)]
pub struct BuildOutput<'a> {
    pub document: Document<'a>,
    /// Structural diagnostics in the order they were detected
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the document tree for `source` from its token stream
pub fn build_document<'a>(source: &'a str, tokens: &[Token<'a>]) -> BuildOutput<'a> {
    let mut builder = DocumentBuilder::new(source);
    for token in tokens {
        builder.feed(token);
    }
    builder.finish()
}

#[derive(Debug)]
enum FrameKind<'a> {
    Root,
    Environment {
        name: &'a str,
        begin: Span,
        verbatim: bool,
    },
    Group {
        delimiter: GroupDelimiter,
        open: Span,
        /// Attach to the preceding command when closed
        argument: bool,
    },
    Math {
        display: bool,
        open: Span,
    },
}

#[derive(Debug)]
struct Frame<'a> {
    kind: FrameKind<'a>,
    children: Vec<Node<'a>>,
}

/// Incremental document builder
#[derive(Debug)]
pub struct DocumentBuilder<'a> {
    source: &'a str,
    stack: Vec<Frame<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            stack: vec![Frame {
                kind: FrameKind::Root,
                children: Vec::new(),
            }],
            diagnostics: Vec::new(),
        }
    }

    /// Apply one token
    pub fn feed(&mut self, token: &Token<'a>) {
        if let Some(name) = self.open_verbatim() {
            // Verbatim bodies are absorbed whole and re-read at the closing marker
            if token.kind == TokenKind::EndEnv && token.name() == Some(name) {
                self.close_environment(token);
            }
            return;
        }

        match token.kind {
            TokenKind::TextRun | TokenKind::Whitespace | TokenKind::Newline => {
                self.push_text(token.span)
            }
            TokenKind::Comment => self.push_node(Node::Comment(Comment {
                text: token.text,
                span: token.span,
            })),
            TokenKind::Command => self.push_command(token.name().unwrap_or_default(), token.span),
            TokenKind::OpenBrace => {
                let argument = self.attaches_to_command(token.span, GroupDelimiter::Brace);
                self.push_frame(FrameKind::Group {
                    delimiter: GroupDelimiter::Brace,
                    open: token.span,
                    argument,
                });
            }
            TokenKind::OpenBracket => {
                if self.attaches_to_command(token.span, GroupDelimiter::Bracket) {
                    self.push_frame(FrameKind::Group {
                        delimiter: GroupDelimiter::Bracket,
                        open: token.span,
                        argument: true,
                    });
                } else {
                    self.push_text(token.span);
                }
            }
            TokenKind::CloseBracket => {
                let top_is_bracket = matches!(
                    self.top().kind,
                    FrameKind::Group {
                        delimiter: GroupDelimiter::Bracket,
                        ..
                    }
                );
                if top_is_bracket {
                    self.pop_frame(token.span.end, Some(token.span));
                } else {
                    self.push_text(token.span);
                }
            }
            TokenKind::CloseBrace => self.close_brace(token),
            TokenKind::BeginEnv => {
                let name = token.name().unwrap_or_default();
                self.push_frame(FrameKind::Environment {
                    name,
                    begin: token.span,
                    verbatim: is_verbatim_environment(name) && !token.math,
                });
            }
            TokenKind::EndEnv => self.close_environment(token),
            TokenKind::MathOpen => self.push_frame(FrameKind::Math {
                display: token.is_display_math(),
                open: token.span,
            }),
            TokenKind::MathClose => self.close_math(token),
        }
    }

    /// Close everything still open and return the finished tree
    pub fn finish(mut self) -> BuildOutput<'a> {
        let eof = self.end_of_input();
        while self.stack.len() > 1 {
            self.implicitly_close_top(eof, true);
        }

        let root = self.stack.pop().map(|frame| frame.children).unwrap_or_default();
        let span = Span::new(Position::default(), eof);
        BuildOutput {
            document: Document {
                source: self.source,
                span,
                children: root,
            },
            diagnostics: self.diagnostics,
        }
    }

    fn end_of_input(&self) -> Position {
        Position::default().advanced_by(self.source)
    }

    fn top(&self) -> &Frame<'a> {
        // The root frame is never popped before `finish`
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame<'a> {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn open_verbatim(&self) -> Option<&'a str> {
        match self.top().kind {
            FrameKind::Environment {
                name,
                verbatim: true,
                ..
            } => Some(name),
            _ => None,
        }
    }

    fn push_frame(&mut self, kind: FrameKind<'a>) {
        self.stack.push(Frame {
            kind,
            children: Vec::new(),
        });
    }

    fn push_text(&mut self, span: Span) {
        let source = self.source;
        let children = &mut self.top_mut().children;
        if let Some(Node::Text(last)) = children.last_mut()
            && last.span.end.offset == span.start.offset
        {
            last.span.end = span.end;
            last.text = last.span.text(source);
            return;
        }
        children.push(Node::Text(TextRun {
            text: span.text(source),
            span,
        }));
    }

    fn push_node(&mut self, node: Node<'a>) {
        match node {
            Node::Text(text) => self.push_text(text.span),
            other => self.top_mut().children.push(other),
        }
    }

    fn push_command(&mut self, name: &'a str, head: Span) {
        self.push_node(Node::Command(Command {
            name,
            head,
            arguments: Vec::new(),
            span: head,
        }));
    }

    /// Whether a group opening at `open` is an argument of the preceding command
    ///
    /// Arguments must touch the command. Bracket groups only count before the
    /// first brace argument.
    fn attaches_to_command(&self, open: Span, delimiter: GroupDelimiter) -> bool {
        match self.top().children.last() {
            Some(Node::Command(cmd)) if cmd.span.end.offset == open.start.offset => {
                delimiter == GroupDelimiter::Brace
                    || cmd.required_arguments().next().is_none()
            }
            _ => false,
        }
    }

    /// Index of the nearest frame matching `pred`, not crossing a math frame
    fn find_frame(&self, pred: impl Fn(&FrameKind<'a>) -> bool) -> Option<usize> {
        for (idx, frame) in self.stack.iter().enumerate().rev() {
            if pred(&frame.kind) {
                return Some(idx);
            }
            if matches!(frame.kind, FrameKind::Math { .. } | FrameKind::Root) {
                return None;
            }
        }
        None
    }

    fn close_brace(&mut self, token: &Token<'a>) {
        let target = self.find_frame(|kind| {
            matches!(
                kind,
                FrameKind::Group {
                    delimiter: GroupDelimiter::Brace,
                    ..
                }
            )
        });
        match target {
            Some(idx) => {
                self.unwind_to(idx, token.span.start);
                self.pop_frame(token.span.end, Some(token.span));
            }
            None => {
                self.report(&structure::UNMATCHED_BRACE, token.span, None);
                self.push_text(token.span);
            }
        }
    }

    fn close_environment(&mut self, token: &Token<'a>) {
        let name = token.name().unwrap_or_default();
        let target = self.find_frame(|kind| {
            matches!(kind, FrameKind::Environment { name: open, .. } if *open == name)
        });
        match target {
            Some(idx) => {
                self.unwind_to(idx, token.span.start);
                self.pop_frame(token.span.end, Some(token.span));
            }
            None => {
                self.report(
                    &structure::UNMATCHED_END,
                    token.span,
                    Some(format!("\\end{{{name}}} without a matching \\begin{{{name}}}.")),
                );
                self.push_command("end", token.span);
            }
        }
    }

    fn close_math(&mut self, token: &Token<'a>) {
        let target = self
            .stack
            .iter()
            .rposition(|frame| matches!(frame.kind, FrameKind::Math { .. }));
        let Some(idx) = target else {
            // Only reachable when the opener was absorbed by a verbatim body
            self.push_text(token.span);
            return;
        };

        self.unwind_to(idx, token.span.start);
        if token.span.is_empty() {
            // Synthetic close at end of input
            if let FrameKind::Math { open, .. } = self.top().kind {
                self.report(&structure::UNCLOSED_MATH, open, None);
            }
            self.pop_frame(token.span.end, None);
        } else {
            self.pop_frame(token.span.end, Some(token.span));
        }
    }

    /// Implicitly close every frame above `idx`, ending them at `at`
    fn unwind_to(&mut self, idx: usize, at: Position) {
        while self.stack.len() - 1 > idx {
            self.implicitly_close_top(at, false);
        }
    }

    fn implicitly_close_top(&mut self, at: Position, end_of_input: bool) {
        match self.top().kind {
            FrameKind::Environment { name, begin, .. } => {
                if end_of_input {
                    self.report(
                        &structure::UNCLOSED_ENVIRONMENT,
                        begin,
                        Some(format!("Environment `{name}` is never closed.")),
                    );
                } else {
                    self.report(
                        &structure::IMPLICITLY_CLOSED_ENVIRONMENT,
                        begin,
                        Some(format!("Environment `{name}` is closed implicitly.")),
                    );
                }
                self.pop_frame(at, None);
            }
            FrameKind::Group {
                delimiter: GroupDelimiter::Brace,
                open,
                ..
            } => {
                self.report(&structure::UNCLOSED_GROUP, open, None);
                self.pop_frame(at, None);
            }
            FrameKind::Group {
                delimiter: GroupDelimiter::Bracket,
                open,
                ..
            } => self.dissolve_bracket(open),
            FrameKind::Math { open, .. } => {
                self.report(&structure::UNCLOSED_MATH, open, None);
                self.pop_frame(at, None);
            }
            FrameKind::Root => {}
        }
    }

    /// An unclosed `[` was never an argument: splice it back as text
    fn dissolve_bracket(&mut self, open: Span) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        self.push_text(open);
        for child in frame.children {
            self.push_node(child);
        }
    }

    /// Pop the top frame and attach the finished node to its parent
    fn pop_frame(&mut self, end: Position, closer: Option<Span>) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame.kind {
            FrameKind::Environment {
                name,
                begin,
                verbatim,
            } => {
                let children = if verbatim {
                    let body_end = closer.map_or(end, |span| span.start);
                    let body = Span::new(begin.end, body_end);
                    if body.is_empty() {
                        Vec::new()
                    } else {
                        vec![Node::Text(TextRun {
                            text: body.text(self.source),
                            span: body,
                        })]
                    }
                } else {
                    frame.children
                };
                self.push_node(Node::Environment(Environment {
                    name,
                    begin,
                    end: closer,
                    children,
                    span: Span::new(begin.start, end),
                    verbatim,
                }));
            }
            FrameKind::Group {
                delimiter,
                open,
                argument,
            } => {
                let group = Group {
                    delimiter,
                    children: frame.children,
                    span: Span::new(open.start, end),
                    closed: closer.is_some(),
                };
                self.attach_group(group, argument);
            }
            FrameKind::Math { display, open } => {
                self.push_node(Node::Math(MathSpan {
                    display,
                    open,
                    close: closer,
                    children: frame.children,
                    span: Span::new(open.start, end),
                }));
            }
            FrameKind::Root => {}
        }
    }

    fn attach_group(&mut self, group: Group<'a>, argument: bool) {
        if argument
            && let Some(Node::Command(cmd)) = self.top_mut().children.last_mut()
        {
            cmd.span = cmd.span.cover(&group.span);
            cmd.arguments.push(group);
            return;
        }
        self.push_node(Node::Group(group));
    }

    fn report(&mut self, metadata: &RuleMetadata, span: Span, message: Option<String>) {
        let message = message.unwrap_or_else(|| metadata.summary.to_string());
        self.diagnostics.push(
            Diagnostic::for_rule(metadata, span, message).with_excerpt(span.text(self.source)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn build(source: &str) -> BuildOutput<'_> {
        let tokens = tokenize(source);
        build_document(source, &tokens)
    }

    fn codes(output: &BuildOutput<'_>) -> Vec<String> {
        output.diagnostics.iter().map(|d| d.code.clone()).collect()
    }

    #[test]
    fn test_well_formed_document_has_no_diagnostics() {
        let output = build("\\begin{document}\nHello \\emph{world}.\n\\end{document}\n");
        assert!(output.diagnostics.is_empty());

        let Node::Environment(env) = &output.document.children[0] else {
            panic!("expected environment");
        };
        assert_eq!(env.name, "document");
        assert!(env.end.is_some());
        assert!(env.children.iter().any(|n| n.is_command_in(&["emph"])));
    }

    #[test]
    fn test_arguments_attach_to_adjacent_command() {
        let output = build("\\cite[p.~4]{knuth84} \\foo {x}");
        let Node::Command(cite) = &output.document.children[0] else {
            panic!("expected command");
        };
        assert_eq!(cite.name, "cite");
        assert_eq!(cite.arguments.len(), 2);
        assert_eq!(cite.arguments[0].delimiter, GroupDelimiter::Bracket);
        assert_eq!(cite.arguments[1].delimiter, GroupDelimiter::Brace);
        assert_eq!(cite.span.text(output.document.source), "\\cite[p.~4]{knuth84}");
        assert_eq!(cite.arguments[1].inner_text(output.document.source), "knuth84");

        // A space between command and brace means a plain group
        let foo = output.document.children[2].as_command().unwrap();
        assert!(foo.arguments.is_empty());
        assert!(matches!(output.document.children[4], Node::Group(_)));
    }

    #[test]
    fn test_bracket_after_brace_argument_is_text() {
        let output = build("\\section{A}[b]");
        let cmd = output.document.children[0].as_command().unwrap();
        assert_eq!(cmd.arguments.len(), 1);
        assert_eq!(output.document.children[1].as_text().unwrap().text, "[b]");
    }

    #[test]
    fn test_unclosed_bracket_dissolves_into_text() {
        let output = build("\\item[ one two");
        assert!(output.diagnostics.is_empty());
        let cmd = output.document.children[0].as_command().unwrap();
        assert!(cmd.arguments.is_empty());
        assert_eq!(output.document.children[1].as_text().unwrap().text, "[ one two");
    }

    #[test]
    fn test_text_tokens_merge() {
        let output = build("one two\nthree [x]");
        assert_eq!(output.document.children.len(), 1);
        assert_eq!(output.document.children[0].as_text().unwrap().text, "one two\nthree [x]");
    }

    #[test]
    fn test_crossed_environments_recover() {
        let output = build("\\begin{itemize}\\begin{enumerate}\\end{itemize}");
        assert_eq!(codes(&output), vec!["900"]);

        let Node::Environment(itemize) = &output.document.children[0] else {
            panic!("expected itemize");
        };
        assert!(itemize.end.is_some());
        let Node::Environment(enumerate) = &itemize.children[0] else {
            panic!("expected enumerate");
        };
        assert_eq!(enumerate.name, "enumerate");
        assert!(enumerate.end.is_none());
        assert_eq!(enumerate.span.end.offset, itemize.end.unwrap().start.offset);
    }

    #[test]
    fn test_unclosed_environment_at_eof() {
        let output = build("\\begin{figure}\ntext");
        assert_eq!(codes(&output), vec!["901"]);
        assert_eq!(output.diagnostics[0].span.start.offset, 0);
        let env = &output.document.children[0];
        assert_eq!(env.span().end.offset, output.document.span.end.offset);
    }

    #[test]
    fn test_unmatched_end_becomes_command() {
        let output = build("text \\end{center} more");
        assert_eq!(codes(&output), vec!["902"]);
        assert!(output.document.children[1].is_command_in(&["end"]));
    }

    #[test]
    fn test_brace_recovery() {
        let output = build("a } b { c");
        assert_eq!(codes(&output), vec!["904", "903"]);
        assert_eq!(output.document.children[0].as_text().unwrap().text, "a } b ");
        let Node::Group(group) = &output.document.children[1] else {
            panic!("expected group");
        };
        assert!(!group.closed);
    }

    #[test]
    fn test_brace_does_not_close_across_math() {
        let output = build("{ $x}$ }");
        assert_eq!(codes(&output), vec!["904"]);
        let Node::Group(group) = &output.document.children[0] else {
            panic!("expected group");
        };
        assert!(group.closed);
        assert!(matches!(group.children[1], Node::Math(_)));
    }

    #[test]
    fn test_unterminated_math() {
        let output = build("see $x + y");
        assert_eq!(codes(&output), vec!["905"]);
        let Node::Math(math) = &output.document.children[1] else {
            panic!("expected math");
        };
        assert!(math.close.is_none());
        assert!(!math.display);
    }

    #[test]
    fn test_verbatim_body_is_opaque() {
        let source = "\\begin{verbatim}\n\\end{itemize} {{ $ http://x.org\n\\end{verbatim}";
        let output = build(source);
        assert!(output.diagnostics.is_empty());
        let Node::Environment(env) = &output.document.children[0] else {
            panic!("expected verbatim");
        };
        assert!(env.verbatim);
        assert_eq!(env.children.len(), 1);
        assert_eq!(
            env.children[0].as_text().unwrap().text,
            "\n\\end{itemize} {{ $ http://x.org\n"
        );
    }

    #[test]
    fn test_for_each_node_visits_arguments_in_order() {
        let output = build("\\a{x\\b}y");
        let mut seen = Vec::new();
        output.document.for_each_node(|node| seen.push(node.kind_name()));
        assert_eq!(seen, vec!["command", "text", "command", "text"]);
    }
}
