// Application state module
// Immutable runtime state shared across connections

use crate::http::headers::{HeaderSetError, SecurityHeaders};

use super::types::Config;

/// Shared application state
///
/// Built once at startup; request handling only reads from it.
pub struct AppState {
    pub config: Config,
    /// Precompiled security header set, attached to every response
    pub security_headers: SecurityHeaders,
}

impl AppState {
    /// Build application state, validating the configured header values
    pub fn new(config: Config) -> Result<Self, HeaderSetError> {
        let security_headers = SecurityHeaders::from_config(&config.headers)?;
        Ok(Self {
            config,
            security_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_default_config() {
        let state = AppState::new(Config::default()).expect("default headers are valid");
        assert_eq!(state.security_headers.len(), 5);
    }

    #[test]
    fn test_state_rejects_bad_header_value() {
        let mut config = Config::default();
        config.headers.frame_options = "DENY\nX-Injected: 1".to_string();
        assert!(AppState::new(config).is_err());
    }
}
