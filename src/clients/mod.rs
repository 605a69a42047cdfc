//! HTTP client infrastructure for the API.
//!
//! This module contains the transport core:
//!
//! - [`Client`]: builds, executes, and buffers authenticated requests
//! - [`ApiRequest`] / [`ApiResponse`]: per-call request and response
//!   types, including parsed [`ResponseMeta`]
//! - [`ApiError`] / [`HttpError`]: the error taxonomy
//! - [`Backoff`] and its policies: retry-delay strategies
//! - [`ListOpts`] and [`Client::fetch_all`]: pagination traversal

mod backoff;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod pagination;

pub use backoff::{Backoff, ConstantBackoff, ExponentialBackoff};
pub use errors::{ApiError, ErrorCode, HttpError, InvalidRequestError};
pub use http_client::Client;
pub use http_request::{ApiRequest, ApiRequestBuilder, HttpMethod};
pub use http_response::{ApiResponse, Pagination, RateLimit, ResponseMeta};
pub use pagination::ListOpts;
