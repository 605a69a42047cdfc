//! # Hetzner Cloud API Rust SDK
//!
//! A Rust SDK for the Hetzner Cloud API, providing type-safe
//! configuration, an async HTTP client with rate-limit-aware retries,
//! transparent pagination, and typed clients for the cloud resources.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the API token and endpoint
//! - Async HTTP client with typed error classification
//! - Automatic retry with pluggable [`Backoff`] when the rate limit is hit
//!   during pagination
//! - Typed resource clients for servers, SSH keys, Floating IPs,
//!   certificates, placement groups, and actions
//!
//! ## Quick Start
//!
//! ```rust
//! use hcloud_api::{ApiToken, Client, ClientConfig};
//!
//! // Create configuration using the builder pattern
//! let config = ClientConfig::builder()
//!     .token(ApiToken::new("your-api-token").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = Client::new(config);
//! ```
//!
//! ## Fetching Resources
//!
//! Each resource has an accessor on [`Client`] returning a typed
//! client. Single-resource getters return `Ok(None)` when the resource
//! does not exist:
//!
//! ```rust,ignore
//! let client = Client::new(config);
//!
//! // Fetch one server, by ID or name
//! if let Some(server) = client.servers().get("my-server").await? {
//!     println!("{} is {:?}", server.name, server.status);
//! }
//!
//! // Fetch all SSH keys across all pages
//! let keys = client.ssh_keys().all().await?;
//! ```
//!
//! ## Creating Resources
//!
//! Create options are validated before any request is sent:
//!
//! ```rust,ignore
//! use hcloud_api::resources::ServerCreateOpts;
//!
//! let result = client
//!     .servers()
//!     .create(ServerCreateOpts {
//!         name: "my-server".to_string(),
//!         server_type: "cx11".to_string(),
//!         image: "ubuntu-22.04".to_string(),
//!         ..ServerCreateOpts::default()
//!     })
//!     .await?;
//!
//! println!("created server {} via action {}", result.server.id, result.action.id);
//! ```
//!
//! ## Retry Behavior
//!
//! When a paginated fetch runs into the API rate limit, the driver
//! waits according to the configured [`Backoff`] and retries the same
//! page. The default is exponential backoff starting at 500ms:
//!
//! ```rust
//! use std::time::Duration;
//! use hcloud_api::clients::ConstantBackoff;
//! use hcloud_api::{ApiToken, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .token(ApiToken::new("your-api-token").unwrap())
//!     .backoff(ConstantBackoff(Duration::from_secs(1)))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and create options validate before I/O
//! - **Thread-safe**: [`Client`] is `Send + Sync` and cheap to share
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Cancellation by drop**: Dropping a request future abandons the call

pub mod clients;
pub mod config;
pub mod error;
pub mod resources;

// Re-export public types at crate root for convenience
pub use config::{ApiEndpoint, ApiToken, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiError, ApiRequest, ApiRequestBuilder, ApiResponse, Backoff, Client, ErrorCode, HttpError,
    HttpMethod, InvalidRequestError, ListOpts, Pagination, RateLimit,
};
