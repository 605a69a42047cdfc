//! Error types for API client operations.
//!
//! This module contains the error taxonomy for HTTP operations:
//!
//! - [`ApiError`]: a structured error reported by the API, carrying a
//!   machine-readable [`ErrorCode`] and a human-readable message
//! - [`InvalidRequestError`]: request or option validation failures,
//!   raised before anything is sent
//! - [`HttpError`]: unified error type encompassing all failure modes
//!
//! # Example
//!
//! ```rust,ignore
//! use hcloud_api::clients::{ErrorCode, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Status: {}", response.status),
//!     Err(HttpError::Api(e)) if e.code == ErrorCode::NotFound => {
//!         println!("No such resource: {}", e.message);
//!     }
//!     Err(HttpError::Api(e)) => println!("API error: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(other) => println!("Request failed: {other}"),
//! }
//! ```

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// A machine-readable error code returned by the API.
///
/// Known codes are modeled as variants; any code this crate does not
/// know about is preserved verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Generic service failure (`service_error`).
    ServiceError,
    /// The request rate limit was reached (`limit_reached`).
    LimitReached,
    /// The requested resource does not exist (`not_found`).
    NotFound,
    /// Fallback code for unclassified failures (`unknown_error`).
    UnknownError,
    /// Any other code the API may return.
    Other(String),
}

impl ErrorCode {
    /// Returns the wire representation of this code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ServiceError => "service_error",
            Self::LimitReached => "limit_reached",
            Self::NotFound => "not_found",
            Self::UnknownError => "unknown_error",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "service_error" => Self::ServiceError,
            "limit_reached" => Self::LimitReached,
            "not_found" => Self::NotFound,
            "unknown_error" => Self::UnknownError,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured error returned by the API.
///
/// The API reports failures as a JSON envelope with a nested `error`
/// object carrying `code` and `message`. The type itself is an opaque
/// data carrier: it embeds no retry or severity judgment. The pagination
/// driver decides what to do based on [`ApiError::code`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} ({code})")]
pub struct ApiError {
    /// The machine-readable error code.
    pub code: ErrorCode,
    /// The human-readable error message.
    pub message: String,
}

/// Wire shape of the API's error envelope.
#[derive(Deserialize, Default)]
struct WireErrorEnvelope {
    #[serde(default)]
    error: WireError,
}

#[derive(Deserialize, Default)]
struct WireError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl ApiError {
    /// Classifies a failed response body into a structured error.
    ///
    /// Returns `None` when no structured error is present:
    /// - the content type is not JSON,
    /// - the body is not valid JSON, or
    /// - both `error.code` and `error.message` are empty after parsing
    ///   (a valid but all-zero envelope would only manufacture a
    ///   misleading error).
    ///
    /// The caller is expected to fall back to a generic status error
    /// ([`HttpError::UnexpectedStatus`]) when this returns `None`.
    #[must_use]
    pub fn from_response(content_type: &str, body: &[u8]) -> Option<Self> {
        if !content_type.starts_with("application/json") {
            return None;
        }

        let envelope: WireErrorEnvelope = serde_json::from_slice(body).ok()?;
        if envelope.error.code.is_empty() && envelope.error.message.is_empty() {
            return None;
        }

        Some(Self {
            code: ErrorCode::from(envelope.error.code.as_str()),
            message: envelope.error.message,
        })
    }
}

/// Error returned when a request fails validation before being sent.
///
/// These failures are always fatal to the call and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// The request URL could not be constructed.
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A POST or PUT request was built without a body.
    #[error("cannot use {method} without a request body")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A required option field was not set.
    #[error("missing field [{field}] in [{opts}]")]
    MissingField {
        /// The field that is missing.
        field: &'static str,
        /// The options struct it belongs to.
        opts: &'static str,
    },

    /// Exactly one of a group of option fields must be set, and none was.
    #[error("missing one of fields [{fields}] in [{opts}]")]
    MissingOneOf {
        /// The mutually alternative fields.
        fields: &'static str,
        /// The options struct they belong to.
        opts: &'static str,
    },

    /// An option field was set to an unsupported value.
    #[error("invalid value '{value}' for field [{field}] in [{opts}]")]
    InvalidValue {
        /// The rejected value.
        value: String,
        /// The field that carried it.
        field: &'static str,
        /// The options struct it belongs to.
        opts: &'static str,
    },
}

/// Unified error type for all client operations.
///
/// The client never swallows errors except for the single
/// `limit_reached` retry path inside the pagination driver; every other
/// failure is surfaced to the immediate caller through this type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A structured error reported by the API.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Request validation failed before anything was sent.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// Network or connection failure. Not retried by the client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server returned a 400–599 status with no parseable
    /// structured error body.
    #[error("server responded with status code {status}")]
    UnexpectedStatus {
        /// The HTTP status code of the response.
        status: u16,
    },

    /// The response's `meta` envelope was malformed JSON.
    #[error("error reading response meta data: {0}")]
    Meta(#[source] serde_json::Error),

    /// The response payload could not be decoded into the target type.
    #[error("error decoding response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl HttpError {
    /// Returns the API error code if this is a structured API error.
    #[must_use]
    pub const fn api_code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Api(err) => Some(&err.code),
            _ => None,
        }
    }

    /// Returns `true` if this error carries the given API error code.
    #[must_use]
    pub fn is_code(&self, code: &ErrorCode) -> bool {
        self.api_code() == Some(code)
    }
}
