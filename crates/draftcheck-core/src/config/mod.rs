//! Configuration system for draftcheck
//!
//! Configuration is optional. When present it is a JSON or JSONC file
//! (comments and trailing commas allowed), found by walking up from the first
//! linted path:
//!
//! - `.draftcheckrc.json`
//! - `.draftcheckrc.jsonc`
//! - `draftcheck.jsonc`
//! - `draftcheck.json`
//!
//! ## Example Configuration
//!
//! ```jsonc
//! {
//!   "linter": {
//!     "enabled": true,
//!     "recommended": true,
//!     "rules": {
//!       "004": "error",
//!       "weasel-word": "warn",
//!       "center-environment": "off"
//!     }
//!   },
//!   "output": {
//!     "contextWidth": 10,
//!     "maxExcerptWidth": 40
//!   }
//! }
//! ```

mod draftcheck_config;
mod loader;

pub use draftcheck_config::{
    DraftcheckConfiguration, LinterConfiguration, OutputConfiguration, RuleSeverity,
};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
