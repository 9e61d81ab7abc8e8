//! Rule engine implementation
//!
//! Resolves the active rule set from configuration, walks the document once
//! per rule with that rule's interest, and merges the results. A rule that
//! panics or returns an error is reported as a diagnostic under its own code
//! and the remaining rules still run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use draftcheck_core::{
    Diagnostic, DraftcheckError, LinterConfiguration, LintContext, Position, Result, Rule,
    RuleEngine, RuleMetadata, Severity, Span, sort_by_location, walk,
};
use tracing::{debug, warn};

use crate::registry::RuleRegistry;

/// A rule with the severity it reports at
struct ActiveRule {
    rule: Arc<dyn Rule>,
    severity: Severity,
}

/// Default implementation of the rule engine
pub struct DefaultRuleEngine {
    rules: Vec<ActiveRule>,
}

impl DefaultRuleEngine {
    /// Engine over the recommended built-in rules
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::global(), &LinterConfiguration::default())
            .unwrap_or_else(|_| Self { rules: Vec::new() })
    }

    /// Engine over the built-in rules selected by `config`
    pub fn from_config(config: &LinterConfiguration) -> Result<Self> {
        Self::with_registry(RuleRegistry::global(), config)
    }

    /// Engine running exactly `rules`, each at its default severity
    pub fn from_rules(rules: Vec<Arc<dyn Rule>>) -> Self {
        let rules = RuleRegistry::from_rules(rules)
            .all()
            .iter()
            .map(|rule| ActiveRule {
                severity: rule.metadata().severity,
                rule: Arc::clone(rule),
            })
            .collect();
        Self { rules }
    }

    /// Resolve the active rules of `registry` against `config`
    ///
    /// Rule keys may be codes or names; when both name the same rule the
    /// code wins. An unknown key is a configuration error.
    pub fn with_registry(registry: &RuleRegistry, config: &LinterConfiguration) -> Result<Self> {
        if let Some(unknown) = config.rules.keys().find(|key| registry.get(key).is_none()) {
            return Err(DraftcheckError::config_error(format!(
                "Unknown rule '{unknown}' in linter.rules"
            )));
        }

        if !config.enabled {
            debug!("Linter disabled by configuration");
            return Ok(Self { rules: Vec::new() });
        }

        let mut rules = Vec::new();
        for rule in registry.all() {
            let metadata = rule.metadata();
            let configured = config
                .rules
                .get(metadata.code)
                .or_else(|| config.rules.get(metadata.name));
            let severity = match configured {
                Some(level) => level.to_severity(),
                None if config.recommended && metadata.recommended => Some(metadata.severity),
                None => None,
            };
            if let Some(severity) = severity {
                rules.push(ActiveRule {
                    rule: Arc::clone(rule),
                    severity,
                });
            }
        }

        debug!("{} of {} rules active", rules.len(), registry.len());
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn run_rule(&self, active: &ActiveRule, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let metadata = active.rule.metadata();
        let events = walk(ctx.document, active.rule.interest());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| active.rule.check(ctx, &events)));

        let failure = match outcome {
            Ok(Ok(diagnostics)) => {
                debug!(
                    "{}: rule {} saw {} events, reported {}",
                    ctx.file,
                    metadata.code,
                    events.len(),
                    diagnostics.len()
                );
                return diagnostics
                    .into_iter()
                    .map(|d| d.with_severity(active.severity))
                    .collect();
            }
            Ok(Err(error)) => error.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        warn!("{}: rule {} crashed: {failure}", ctx.file, metadata.code);
        vec![crash_diagnostic(metadata, &failure)]
    }
}

impl Default for DefaultRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine for DefaultRuleEngine {
    fn check(&self, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for active in &self.rules {
            diagnostics.extend(self.run_rule(active, ctx));
        }
        sort_by_location(&mut diagnostics);
        diagnostics
    }

    fn active_rules(&self) -> Vec<&RuleMetadata> {
        self.rules.iter().map(|active| active.rule.metadata()).collect()
    }
}

fn crash_diagnostic(metadata: &RuleMetadata, failure: &str) -> Diagnostic {
    Diagnostic::new(
        metadata.code,
        Severity::Error,
        format!("Rule crashed: {failure}"),
        Span::empty(Position::default()),
    )
    .with_name(metadata.name)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
