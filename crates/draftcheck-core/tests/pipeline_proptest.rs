//! Property-based tests for the tokenizer and document builder
//!
//! Inputs are generated from LaTeX fragments that are deliberately allowed to
//! be unbalanced, plus arbitrary Unicode text.

use draftcheck_core::{Node, SourceMap, Span, build_document, tokenize};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "\\begin{itemize}",
    "\\end{itemize}",
    "\\begin{enumerate}",
    "\\end{enumerate}",
    "\\begin{verbatim}",
    "\\end{verbatim}",
    "\\begin{equation}",
    "\\end{equation}",
    "{",
    "}",
    "[",
    "]",
    "$",
    "$$",
    "\\[",
    "\\]",
    "\\(",
    "\\)",
    "% note",
    "\\cite",
    "\\emph",
    "\\verb|a b|",
    "\\\\",
    "\\%",
    "\\",
    " ",
    "\t",
    "\n",
    "\r\n",
    "~",
    "word",
    "``",
    "''",
    "http://example.com/x",
    "é",
    "日本",
];

fn latex_like() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..80).prop_map(|parts| parts.concat())
}

fn check_containment(parent: Span, nodes: &[Node<'_>]) {
    let mut previous_end = parent.start.offset;
    for node in nodes {
        let span = node.span();
        assert!(parent.contains(&span), "{span:?} escapes {parent:?}");
        assert!(span.start.offset >= previous_end, "siblings overlap at {span:?}");
        previous_end = span.end.offset;

        if let Node::Command(cmd) = node {
            let mut arg_end = cmd.head.end.offset;
            for arg in &cmd.arguments {
                assert!(span.contains(&arg.span));
                assert!(arg.span.start.offset >= arg_end);
                arg_end = arg.span.end.offset;
                check_containment(arg.span, &arg.children);
            }
        }
        check_containment(span, node.children());
    }
}

proptest! {
    #[test]
    fn tokenizer_is_lossless(source in "\\PC*") {
        let rebuilt: String = tokenize(&source).iter().map(|t| t.text).collect();
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn tokenizer_is_lossless_on_latex(source in latex_like()) {
        let rebuilt: String = tokenize(&source).iter().map(|t| t.text).collect();
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn positions_are_contiguous_and_match_source_map(source in latex_like()) {
        let map = SourceMap::new(&source);
        let tokens = tokenize(&source);
        let mut expected = map.position(0, &source);
        for token in &tokens {
            prop_assert_eq!(token.span.start, expected);
            prop_assert_eq!(token.span.end, map.position(token.span.end.offset, &source));
            expected = token.span.end;
        }
        prop_assert_eq!(expected.offset, source.len());
    }

    #[test]
    fn tree_spans_are_contained_and_ordered(source in latex_like()) {
        let tokens = tokenize(&source);
        let output = build_document(&source, &tokens);
        prop_assert_eq!(output.document.span.end.offset, source.len());
        check_containment(output.document.span, &output.document.children);
    }

    #[test]
    fn build_is_deterministic(source in latex_like()) {
        let tokens = tokenize(&source);
        let first = build_document(&source, &tokens);
        let second = build_document(&source, &tokens);
        prop_assert_eq!(first.document, second.document);
        prop_assert_eq!(first.diagnostics, second.diagnostics);
    }
}
