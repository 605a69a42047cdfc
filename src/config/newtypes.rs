//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that
//! validate their contents on construction. Invalid values are rejected
//! with clear error messages.

use std::fmt;

use crate::error::ConfigError;

/// A validated API token.
///
/// This newtype ensures the token is non-empty and masks its value in
/// debug output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation masks the token value, displaying
/// `ApiToken(*****)` instead of the actual token.
///
/// # Example
///
/// ```rust
/// use hcloud_api::ApiToken;
///
/// let token = ApiToken::new("my-secret-token").unwrap();
/// assert_eq!(format!("{token:?}"), "ApiToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new validated API token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiToken(*****)")
    }
}

/// A validated API endpoint URL.
///
/// Trailing slashes are trimmed so request paths can be appended
/// directly.
///
/// # Example
///
/// ```rust
/// use hcloud_api::ApiEndpoint;
///
/// let endpoint = ApiEndpoint::new("https://api.hetzner.cloud/v1/").unwrap();
/// assert_eq!(endpoint.as_ref(), "https://api.hetzner.cloud/v1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoint(String);

impl ApiEndpoint {
    /// The production API endpoint.
    pub const DEFAULT: &'static str = "https://api.hetzner.cloud/v1";

    /// Creates a new validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the value is not an
    /// absolute URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        reqwest::Url::parse(&url).map_err(|err| ConfigError::InvalidEndpoint {
            url: url.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self(url.trim_end_matches('/').to_string()))
    }
}

impl AsRef<str> for ApiEndpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        // The constant is a known-valid URL.
        Self(Self::DEFAULT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_rejects_empty() {
        assert_eq!(ApiToken::new(""), Err(ConfigError::EmptyToken));
    }

    #[test]
    fn test_api_token_masks_debug_output() {
        let token = ApiToken::new("super-secret").unwrap();
        let debug = format!("{token:?}");
        assert_eq!(debug, "ApiToken(*****)");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_api_token_exposes_value_via_as_ref() {
        let token = ApiToken::new("super-secret").unwrap();
        assert_eq!(token.as_ref(), "super-secret");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let endpoint = ApiEndpoint::new("https://example.com/v1/").unwrap();
        assert_eq!(endpoint.as_ref(), "https://example.com/v1");
    }

    #[test]
    fn test_endpoint_rejects_relative_urls() {
        let result = ApiEndpoint::new("/v1");
        assert!(matches!(result, Err(ConfigError::InvalidEndpoint { .. })));
    }

    #[test]
    fn test_endpoint_default_is_production() {
        assert_eq!(ApiEndpoint::default().as_ref(), "https://api.hetzner.cloud/v1");
    }
}
