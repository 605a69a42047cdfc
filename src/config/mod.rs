//! Client configuration.
//!
//! This module provides [`ClientConfig`] and its builder. Configuration
//! is instance-based, validated on construction, and read-only
//! afterwards; a client built from it holds no mutable shared state, so
//! concurrent calls require no locking.
//!
//! # Example
//!
//! ```rust
//! use hcloud_api::{ApiToken, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .token(ApiToken::new("my-token").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

use std::fmt;
use std::sync::Arc;

use crate::clients::{Backoff, ExponentialBackoff};
use crate::error::ConfigError;

pub use newtypes::{ApiEndpoint, ApiToken};

/// Read-only configuration for a [`Client`](crate::Client).
///
/// Use [`ClientConfig::builder`] to construct one. The backoff policy
/// is shared behind an `Arc` because every in-flight call on the client
/// consults the same instance.
#[derive(Clone)]
pub struct ClientConfig {
    endpoint: ApiEndpoint,
    token: ApiToken,
    backoff: Arc<dyn Backoff>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Returns the API endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    /// Returns the API token.
    #[must_use]
    pub const fn token(&self) -> &ApiToken {
        &self.token
    }

    /// Returns the backoff policy used for rate-limit retries.
    #[must_use]
    pub fn backoff(&self) -> &dyn Backoff {
        self.backoff.as_ref()
    }

    /// Returns the `User-Agent` header value for this configuration.
    #[must_use]
    pub fn user_agent(&self) -> String {
        let version = env!("CARGO_PKG_VERSION");
        self.user_agent_prefix.as_ref().map_or_else(
            || format!("hcloud-api-rust/{version}"),
            |prefix| format!("{prefix} hcloud-api-rust/{version}"),
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token)
            .field("user_agent_prefix", &self.user_agent_prefix)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ClientConfig`].
///
/// Only the token is required; the endpoint defaults to the production
/// API and the backoff policy defaults to exponential backoff with base
/// 2 and a 500ms unit.
#[derive(Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<ApiEndpoint>,
    token: Option<ApiToken>,
    backoff: Option<Arc<dyn Backoff>>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Sets the API token. Required.
    #[must_use]
    pub fn token(mut self, token: ApiToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the API endpoint. Defaults to [`ApiEndpoint::DEFAULT`].
    #[must_use]
    pub fn endpoint(mut self, endpoint: ApiEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the backoff policy for rate-limit retries.
    #[must_use]
    pub fn backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Some(Arc::new(backoff));
        self
    }

    /// Sets a prefix prepended to the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] if no token was provided.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let token = self.token.ok_or(ConfigError::MissingToken)?;
        Ok(ClientConfig {
            endpoint: self.endpoint.unwrap_or_default(),
            token,
            backoff: self
                .backoff
                .unwrap_or_else(|| Arc::new(ExponentialBackoff::default())),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::clients::ConstantBackoff;

    fn test_token() -> ApiToken {
        ApiToken::new("test-token").unwrap()
    }

    #[test]
    fn test_builder_requires_token() {
        let result = ClientConfig::builder().build();
        assert_eq!(result.err(), Some(ConfigError::MissingToken));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder().token(test_token()).build().unwrap();

        assert_eq!(config.endpoint().as_ref(), ApiEndpoint::DEFAULT);
        // Default policy is exponential: 500ms, 1000ms, ...
        assert_eq!(config.backoff().delay(0), Duration::from_millis(500));
        assert_eq!(config.backoff().delay(1), Duration::from_millis(1000));
    }

    #[test]
    fn test_builder_custom_backoff() {
        let config = ClientConfig::builder()
            .token(test_token())
            .backoff(ConstantBackoff(Duration::from_secs(2)))
            .build()
            .unwrap();

        assert_eq!(config.backoff().delay(9), Duration::from_secs(2));
    }

    #[test]
    fn test_user_agent_without_prefix() {
        let config = ClientConfig::builder().token(test_token()).build().unwrap();
        assert!(config.user_agent().starts_with("hcloud-api-rust/"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ClientConfig::builder()
            .token(test_token())
            .user_agent_prefix("my-app/1.0")
            .build()
            .unwrap();

        let user_agent = config.user_agent();
        assert!(user_agent.starts_with("my-app/1.0 "));
        assert!(user_agent.contains("hcloud-api-rust/"));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ClientConfig::builder()
            .token(ApiToken::new("super-secret").unwrap())
            .build()
            .unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
