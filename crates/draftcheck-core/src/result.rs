//! Result alias and helpers for draftcheck operations

use tracing::{error, warn};

use crate::error::DraftcheckError;

pub type Result<T> = std::result::Result<T, DraftcheckError>;

pub trait ResultExt<T> {
    /// Log the error under `what` and drop it
    ///
    /// Recoverable errors log at warn level, the rest at error level.
    fn log_and_continue(self, what: &str) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_and_continue(self, what: &str) -> Option<T> {
        self.map_err(|err| {
            if err.is_recoverable() {
                warn!("{what}: {err}");
            } else {
                error!("{what}: {err}");
            }
        })
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_continue_drops_errors() {
        let ok: Result<u8> = Ok(1);
        assert_eq!(ok.log_and_continue("reading"), Some(1));

        let rule_failure: Result<u8> = Err(DraftcheckError::rule_error("030", "bad"));
        assert_eq!(rule_failure.log_and_continue("checking"), None);

        let config_failure: Result<u8> = Err(DraftcheckError::config_error("bad"));
        assert_eq!(config_failure.log_and_continue("loading"), None);
    }
}
