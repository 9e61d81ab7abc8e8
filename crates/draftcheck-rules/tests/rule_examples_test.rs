//! Every rule's long help carries Bad/Good examples; this suite runs each rule
//! alone over its own examples so the help text can never drift from the
//! implementation.

use std::sync::Arc;

use draftcheck_core::lint_source;
use draftcheck_rules::{DefaultRuleEngine, RuleRegistry};

/// Example blocks of an explanation as (is_bad, source) pairs
fn examples(explanation: &str) -> Vec<(bool, String)> {
    explanation
        .split("\n\n")
        .filter_map(|block| {
            let (label, body) = block.split_once('\n')?;
            let bad = match label.trim() {
                "Bad:" => true,
                "Good:" => false,
                _ => return None,
            };
            let source = body
                .lines()
                .map(|line| line.strip_prefix("    ").unwrap_or(line))
                .collect::<Vec<_>>()
                .join("\n");
            Some((bad, source))
        })
        .collect()
}

#[test]
fn test_every_rule_has_bad_and_good_examples() {
    for metadata in RuleRegistry::global().metadata() {
        let found = examples(metadata.explanation);
        assert!(
            found.iter().any(|(bad, _)| *bad),
            "rule {} has no Bad example",
            metadata.code
        );
        assert!(
            found.iter().any(|(bad, _)| !*bad),
            "rule {} has no Good example",
            metadata.code
        );
        assert!(
            metadata.explanation.starts_with(metadata.summary),
            "rule {} explanation does not open with its summary",
            metadata.code
        );
    }
}

#[test]
fn test_examples_match_rule_behaviour() {
    for rule in RuleRegistry::global().all() {
        let metadata = rule.metadata();
        let engine = DefaultRuleEngine::from_rules(vec![Arc::clone(rule)]);

        for (bad, source) in examples(metadata.explanation) {
            let report = lint_source("example.tex", &source, &engine);
            let own: Vec<_> = report
                .diagnostics
                .iter()
                .filter(|d| d.code == metadata.code)
                .collect();
            if bad {
                assert!(
                    !own.is_empty(),
                    "rule {} did not flag its Bad example:\n{source}",
                    metadata.code
                );
            } else {
                assert!(
                    own.is_empty(),
                    "rule {} flagged its Good example:\n{source}\n{own:?}",
                    metadata.code
                );
            }
        }
    }
}

#[test]
fn test_examples_are_structurally_sound() {
    let structural_only = DefaultRuleEngine::from_rules(vec![]);
    for metadata in RuleRegistry::global().metadata() {
        for (_, source) in examples(metadata.explanation) {
            let report = lint_source("example.tex", &source, &structural_only);
            assert!(
                report.diagnostics.is_empty(),
                "example of rule {} is malformed LaTeX: {:?}",
                metadata.code,
                report.diagnostics
            );
        }
    }
}
