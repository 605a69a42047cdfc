//! HTTP response types for the API client.
//!
//! This module provides the [`ApiResponse`] type along with the parsed
//! response metadata: rate-limit headers and the JSON-embedded
//! pagination block.

use std::collections::HashMap;
use std::io;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::clients::errors::HttpError;

/// Rate-limit information parsed from the `RateLimit-*` response headers.
///
/// A missing or unparsable header leaves the corresponding field at its
/// zero value; header parsing never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// Maximum requests per window (`RateLimit-Limit`).
    pub limit: u32,
    /// Requests remaining in the current window (`RateLimit-Remaining`).
    pub remaining: u32,
    /// When the window resets (`RateLimit-Reset`, unix seconds).
    pub reset: Option<DateTime<Utc>>,
}

/// Pagination metadata from the response envelope's `meta.pagination`
/// object.
///
/// The API sends `null` for fields without a meaningful value, e.g.
/// `next_page` on the last page. Missing and null fields both decode to
/// zero; `next_page == 0` denotes "no further pages" and is what the
/// pagination driver checks to terminate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// The current page number (1-based).
    #[serde(default, deserialize_with = "null_to_zero")]
    pub page: u32,
    /// Items per page.
    #[serde(default, deserialize_with = "null_to_zero")]
    pub per_page: u32,
    /// The previous page number, 0 if none.
    #[serde(default, deserialize_with = "null_to_zero")]
    pub previous_page: u32,
    /// The next page number, 0 if none.
    #[serde(default, deserialize_with = "null_to_zero")]
    pub next_page: u32,
    /// The last page number.
    #[serde(default, deserialize_with = "null_to_zero")]
    pub last_page: u32,
    /// Total number of entries across all pages.
    #[serde(default, deserialize_with = "null_to_zero")]
    pub total_entries: u32,
}

fn null_to_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata included in an API response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Rate-limit snapshot from the response headers.
    pub rate_limit: RateLimit,
    /// Pagination block, present only for JSON responses. A JSON
    /// response without a `meta.pagination` key yields an all-zero
    /// block.
    pub pagination: Option<Pagination>,
}

/// Wire shape of the envelope's `meta` object.
#[derive(Deserialize, Default)]
struct WireMetaEnvelope {
    #[serde(default)]
    meta: WireMeta,
}

#[derive(Deserialize, Default)]
struct WireMeta {
    #[serde(default)]
    pagination: Pagination,
}

impl ResponseMeta {
    /// Parses response metadata from headers and the buffered body.
    ///
    /// Rate-limit fields are parsed independently and never error.
    /// Pagination is parsed only when the content type indicates a JSON
    /// body; parsing the same headers and body twice yields identical
    /// metadata.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Meta`] when the content type is JSON but the
    /// body is not valid JSON.
    pub fn parse(
        headers: &HashMap<String, Vec<String>>,
        body: &[u8],
    ) -> Result<Self, HttpError> {
        let first = |name: &str| headers.get(name).and_then(|values| values.first());

        let rate_limit = RateLimit {
            limit: first("ratelimit-limit")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            remaining: first("ratelimit-remaining")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            reset: first("ratelimit-reset")
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        };

        let is_json = first("content-type").is_some_and(|ct| ct.starts_with("application/json"));
        let pagination = if is_json && !body.is_empty() {
            let envelope: WireMetaEnvelope =
                serde_json::from_slice(body).map_err(HttpError::Meta)?;
            Some(envelope.meta.pagination)
        } else {
            None
        };

        Ok(Self {
            rate_limit,
            pagination,
        })
    }
}

/// An HTTP response from the API.
///
/// The entire body is buffered at receipt so it can be inspected
/// multiple times: once for metadata, once for error classification,
/// and finally for payload decoding. The response lives for the
/// duration of a single client call and is not retained.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lowercase name; a header may carry
    /// multiple values.
    pub headers: HashMap<String, Vec<String>>,
    /// The buffered response body.
    body: Vec<u8>,
    /// Parsed response metadata.
    pub meta: ResponseMeta,
}

impl ApiResponse {
    /// Creates a new response, parsing metadata from the headers and
    /// buffered body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Meta`] when a JSON body is malformed.
    pub fn new(
        status: u16,
        headers: HashMap<String, Vec<String>>,
        body: Vec<u8>,
    ) -> Result<Self, HttpError> {
        let meta = ResponseMeta::parse(&headers, &body)?;
        Ok(Self {
            status,
            headers,
            body,
            meta,
        })
    }

    /// Returns the buffered response body.
    ///
    /// The body is buffered once at receipt; reading it any number of
    /// times yields the same bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the first value of the given header, if present.
    /// Header names are matched in lowercase.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the response's content type, or an empty string.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or_default()
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Decodes the buffered body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body is not valid JSON for
    /// the target type.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(HttpError::Decode)
    }

    /// Copies the buffered body verbatim into a raw byte sink.
    ///
    /// This is the passthrough decoding destination for binary
    /// payloads; no JSON decoding is attempted.
    ///
    /// # Errors
    ///
    /// Returns any error produced by the sink.
    pub fn copy_body_to<W: io::Write>(&self, sink: &mut W) -> io::Result<u64> {
        sink.write_all(&self.body)?;
        Ok(self.body.len() as u64)
    }
}
