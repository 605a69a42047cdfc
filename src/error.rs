//! Configuration error types.

use thiserror::Error;

/// Errors raised while constructing client configuration.
///
/// All configuration values validate on construction, so a successfully
/// built [`ClientConfig`](crate::ClientConfig) is known to be usable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The API token is empty.
    #[error("API token must not be empty")]
    EmptyToken,

    /// The endpoint is not a valid absolute URL.
    #[error("invalid API endpoint '{url}': {reason}")]
    InvalidEndpoint {
        /// The rejected endpoint value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No API token was provided to the builder.
    #[error("missing required configuration field: token")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::EmptyToken.to_string(), "API token must not be empty");
        assert_eq!(
            ConfigError::MissingToken.to_string(),
            "missing required configuration field: token"
        );
        let err = ConfigError::InvalidEndpoint {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("not a url"));
    }
}
