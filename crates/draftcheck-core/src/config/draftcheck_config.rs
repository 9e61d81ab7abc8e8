//! Configuration types for draftcheck

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::diagnostics::Severity;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftcheckConfiguration {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub linter: LinterConfiguration,
    pub output: OutputConfiguration,
}

/// Linter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LinterConfiguration {
    /// Enable/disable linter
    pub enabled: bool,

    /// Enable every rule marked recommended
    pub recommended: bool,

    /// Per-rule severity, keyed by code (`"004"`) or name (`"citation-spacing"`)
    pub rules: BTreeMap<String, RuleSeverity>,
}

/// Text report layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfiguration {
    /// Characters of context on each side of the excerpt
    pub context_width: usize,
    /// Longest excerpt underlined before clipping
    pub max_excerpt_width: usize,
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity, `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

impl Default for LinterConfiguration {
    fn default() -> Self {
        Self {
            enabled: true,
            recommended: true,
            rules: BTreeMap::new(),
        }
    }
}

impl Default for OutputConfiguration {
    fn default() -> Self {
        Self {
            context_width: 10,
            max_excerpt_width: 40,
        }
    }
}
