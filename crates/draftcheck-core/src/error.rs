//! Error types and handling for draftcheck operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for draftcheck operations
#[derive(Debug, Error)]
pub enum DraftcheckError {
    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input that cannot be decoded as UTF-8 text
    #[error("Cannot decode '{path}' as UTF-8 text (invalid byte at offset {offset})")]
    EncodingError { path: PathBuf, offset: usize },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Internal failure of a single rule checker
    #[error("Rule error in '{rule_code}': {message}")]
    RuleError { rule_code: String, message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Encoding,
    Config,
    Rule,
    Internal,
}

impl DraftcheckError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DraftcheckError::IoError { .. } => ErrorKind::Io,
            DraftcheckError::EncodingError { .. } => ErrorKind::Encoding,
            DraftcheckError::ConfigError { .. } => ErrorKind::Config,
            DraftcheckError::RuleError { .. } => ErrorKind::Rule,
            DraftcheckError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (processing of other files can continue)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Io | ErrorKind::Encoding | ErrorKind::Rule
        )
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule error
    pub fn rule_error(rule_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_code: rule_code.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an encoding error for undecodable input
    pub fn encoding_error(path: impl Into<PathBuf>, offset: usize) -> Self {
        Self::EncodingError {
            path: path.into(),
            offset,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = DraftcheckError::config_error("bad key");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!err.is_recoverable());

        let err = DraftcheckError::rule_error("014", "boom");
        assert_eq!(err.kind(), ErrorKind::Rule);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_encoding_error_names_file_and_offset() {
        let err = DraftcheckError::encoding_error("paper.tex", 12);
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("paper.tex"));
        assert!(err.to_string().contains("12"));
    }
}
