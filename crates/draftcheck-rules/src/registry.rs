//! Read-only registry of every known rule

use std::sync::Arc;

use draftcheck_core::{Rule, RuleMetadata};
use once_cell::sync::Lazy;

use crate::builtin;

static REGISTRY: Lazy<RuleRegistry> = Lazy::new(RuleRegistry::builtin);

/// All rules, ordered by code
///
/// Built once per process and never mutated afterwards, so it is shared
/// freely between worker threads.
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// The process-wide registry of built-in rules
    pub fn global() -> &'static RuleRegistry {
        &REGISTRY
    }

    fn builtin() -> Self {
        Self::from_rules(builtin::all_rules())
    }

    /// Registry over an explicit rule set
    pub fn from_rules(mut rules: Vec<Arc<dyn Rule>>) -> Self {
        rules.sort_by(|a, b| a.metadata().code.cmp(b.metadata().code));
        Self { rules }
    }

    /// Look a rule up by code (`"004"`) or name (`"citation-spacing"`)
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Rule>> {
        self.rules
            .iter()
            .find(|rule| rule.metadata().code == key)
            .or_else(|| self.rules.iter().find(|rule| rule.metadata().name == key))
    }

    pub fn all(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn metadata(&self) -> impl Iterator<Item = &RuleMetadata> {
        self.rules.iter().map(|rule| rule.metadata())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
