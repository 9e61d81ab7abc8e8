//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DraftcheckConfiguration;
use crate::{DraftcheckError, Result};

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".draftcheckrc.json",
    ".draftcheckrc.jsonc",
    "draftcheck.jsonc",
    "draftcheck.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// `start_path` may be a file, in which case the search starts in its
    /// directory. The first name in [`CONFIG_FILE_NAMES`] found wins.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let start = start_path
            .canonicalize()
            .map_err(|e| DraftcheckError::config_error(format!("Invalid path: {e}")))?;
        let mut current = if start.is_file() {
            start.parent().map(Path::to_path_buf).unwrap_or(start)
        } else {
            start
        };

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific JSON/JSONC file
    pub fn load_from_file(path: &Path) -> Result<DraftcheckConfiguration> {
        let content = fs::read_to_string(path).map_err(|e| {
            DraftcheckError::config_error(format!(
                "Failed to read config '{}': {e}",
                path.display()
            ))
        })?;

        json5::from_str(&content).map_err(|e| {
            DraftcheckError::config_error(format!(
                "Failed to parse config '{}': {e}",
                path.display()
            ))
        })
    }

    /// Load config from an explicit path, or discover one from `start_path`
    ///
    /// No config found means defaults; an explicit path that does not exist
    /// is an error.
    pub fn load(
        custom_path: Option<&Path>,
        start_path: Option<&Path>,
    ) -> Result<DraftcheckConfiguration> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(DraftcheckError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search = start_path.unwrap_or_else(|| Path::new("."));
        // An unreadable start path is reported later, when it is linted
        let discovered = match Self::auto_discover(search) {
            Ok(found) => found,
            Err(e) => {
                debug!("Skipping config discovery: {e}");
                None
            }
        };

        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(DraftcheckConfiguration::default())
            }
        }
    }

    /// Write a default `.draftcheckrc.json` into `dir`
    pub fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAMES[0]);
        if path.exists() && !force {
            return Err(DraftcheckError::config_error(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        let content = serde_json::to_string_pretty(&DraftcheckConfiguration::default())
            .map_err(|e| DraftcheckError::internal_error(format!("Failed to serialize: {e}")))?;
        fs::write(&path, content + "\n").map_err(|e| DraftcheckError::io_error(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleSeverity;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_jsonc() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "draftcheck.jsonc",
            r#"{
                // comments and trailing commas are fine
                "linter": {
                    "recommended": false,
                    "rules": { "004": "error", "weasel-word": "warn", },
                },
            }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert!(config.linter.enabled);
        assert!(!config.linter.recommended);
        assert_eq!(config.linter.rules.get("004"), Some(&RuleSeverity::Error));
        assert_eq!(
            config.linter.rules.get("weasel-word"),
            Some(&RuleSeverity::Warn)
        );
    }

    #[test]
    fn test_auto_discover_from_nested_file() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("chapters/intro");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "draftcheck.json", "{}");
        let tex = create_temp_config(&nested, "intro.tex", "text");

        let found = ConfigLoader::auto_discover(&tex).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "draftcheck.json");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "draftcheck.json", "{}");
        create_temp_config(temp_dir.path(), ".draftcheckrc.jsonc", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), ".draftcheckrc.jsonc");
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "bad.json", "{ invalid json }");
        let err = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        assert!(ConfigLoader::load(Some(Path::new("does/not/exist.json")), None).is_err());
    }

    #[test]
    fn test_write_default_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::write_default(temp_dir.path(), false).unwrap();
        assert!(path.ends_with(".draftcheckrc.json"));
        assert!(ConfigLoader::write_default(temp_dir.path(), false).is_err());
        assert!(ConfigLoader::write_default(temp_dir.path(), true).is_ok());

        let config = ConfigLoader::load(None, Some(temp_dir.path())).unwrap();
        assert_eq!(config, DraftcheckConfiguration::default());
    }
}
