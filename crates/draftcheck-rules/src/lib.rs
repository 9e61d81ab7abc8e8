//! Draftcheck Rules
//!
//! The built-in rule catalogue, the process-wide [`RuleRegistry`] and the
//! [`DefaultRuleEngine`] that runs a configured subset of it over a file.

pub mod builtin;
pub mod engine;
pub mod registry;

pub use builtin::{BuiltinRule, CheckFn};
pub use engine::DefaultRuleEngine;
pub use registry::RuleRegistry;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
