//! HTTP client for API communication.
//!
//! This module provides the [`Client`] type: it builds authenticated
//! requests, executes them, buffers the response body, and classifies
//! failed responses into typed errors.

use std::collections::HashMap;

use crate::clients::errors::{ApiError, HttpError, InvalidRequestError};
use crate::clients::http_request::{ApiRequest, HttpMethod};
use crate::clients::http_response::ApiResponse;
use crate::config::ClientConfig;

/// Client for the Hetzner Cloud API.
///
/// The client handles:
/// - URL construction from the configured endpoint and request paths
/// - Default headers: bearer-token authentication and a fixed User-Agent
/// - Full response body buffering, so metadata parsing, error
///   classification, and payload decoding can all read the same bytes
/// - Typed error classification for 400–599 responses
///
/// # Thread safety
///
/// `Client` is `Send + Sync`. Its configuration is read-only after
/// construction, so any number of calls may run concurrently against
/// the same instance without locking. Each call owns its request and
/// response; nothing is shared across calls.
///
/// # Cancellation
///
/// Every operation is an ordinary future: dropping it cancels any
/// pending network I/O and any pending backoff sleep.
///
/// # Example
///
/// ```rust,ignore
/// use hcloud_api::{ApiToken, Client, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .token(ApiToken::new("my-token")?)
///     .build()?;
/// let client = Client::new(config);
///
/// let servers = client.servers().all().await?;
/// ```
#[derive(Debug)]
pub struct Client {
    /// The internal reqwest HTTP client.
    http: reqwest::Client,
    /// Read-only configuration.
    config: ClientConfig,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a new client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g. TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self { http, config }
    }

    /// Returns the client's configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a request to the API and returns the buffered response.
    ///
    /// Headers set on every request:
    /// - `Authorization: Bearer <token>`
    /// - a fixed `User-Agent` identifying this library
    /// - `Content-Type: application/json`, only when a body is present
    ///
    /// The entire body is read into memory before this method returns,
    /// so the returned [`ApiResponse`] can be inspected and decoded any
    /// number of times.
    ///
    /// # Errors
    ///
    /// - [`HttpError::InvalidRequest`]: malformed URL or invalid request
    /// - [`HttpError::Network`]: connection or protocol failure
    /// - [`HttpError::Api`]: the server reported a structured error
    /// - [`HttpError::UnexpectedStatus`]: 400–599 status without a
    ///   structured error body
    /// - [`HttpError::Meta`]: the response's JSON envelope was malformed
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}", self.config.endpoint().as_ref(), request.path);
        let url = reqwest::Url::parse(&url).map_err(|err| {
            InvalidRequestError::InvalidUrl {
                url: url.clone(),
                reason: err.to_string(),
            }
        })?;

        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => self.http.post(url),
            HttpMethod::Put => self.http.put(url),
            HttpMethod::Delete => self.http.delete(url),
        };

        builder = builder
            .header(
                "Authorization",
                format!("Bearer {}", self.config.token().as_ref()),
            )
            .header("User-Agent", self.config.user_agent());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        // .json() also sets Content-Type: application/json; requests
        // without a body carry no content type at all.
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder.send().await?;

        let status = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            "API request completed"
        );

        let response = ApiResponse::new(status, headers, body)?;

        if (400..=599).contains(&status) {
            return match ApiError::from_response(response.content_type(), response.body()) {
                Some(api_error) => Err(HttpError::Api(api_error)),
                None => Err(HttpError::UnexpectedStatus { status }),
            };
        }

        Ok(response)
    }

    /// Parses response headers into a map keyed by lowercase name.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
