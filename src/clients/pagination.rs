//! Pagination traversal for "fetch all" operations.
//!
//! This module provides [`ListOpts`], the page/per-page query options
//! shared by every list operation, and the [`Client::fetch_all`]
//! driver that walks a paginated endpoint to exhaustion.

use std::future::Future;

use crate::clients::errors::{ErrorCode, HttpError};
use crate::clients::http_client::Client;
use crate::clients::http_response::ApiResponse;

/// Options for listing resources.
///
/// Query parameters are added only when set, so zero-valued options
/// leave the request untouched and the server applies its defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOpts {
    /// Page to fetch (1-based).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ListOpts {
    /// Returns the query parameters for these options.
    #[must_use]
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".to_string(), per_page.to_string()));
        }
        params
    }
}

impl Client {
    /// Fetches every page of a listing and concatenates the results.
    ///
    /// `fetch` is invoked with a 1-based page number and must return
    /// that page's items together with the [`ApiResponse`] whose
    /// pagination metadata drives the traversal:
    ///
    /// 1. On a `limit_reached` API error, the driver sleeps according
    ///    to the configured backoff policy and retries the SAME page.
    ///    The retry counter resets after every successful page. There
    ///    is no internal retry ceiling; the loop is bounded only by the
    ///    backoff policy and by the caller dropping the future.
    /// 2. Any other error aborts the whole operation immediately; no
    ///    partial results are returned.
    /// 3. The traversal ends when pagination metadata is absent or
    ///    `next_page == 0`; otherwise the next fetch uses `next_page`.
    ///
    /// Items are returned in page order.
    ///
    /// # Errors
    ///
    /// The first non-retryable [`HttpError`] encountered.
    pub async fn fetch_all<T, F, Fut>(&self, mut fetch: F) -> Result<Vec<T>, HttpError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<(Vec<T>, ApiResponse), HttpError>>,
    {
        let mut page = 1;
        let mut retries = 0;
        let mut items = Vec::new();

        loop {
            match fetch(page).await {
                Err(err) if err.is_code(&ErrorCode::LimitReached) => {
                    let delay = self.config().backoff().delay(retries);
                    tracing::warn!(
                        page,
                        retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "rate limit reached, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                Err(err) => return Err(err),
                Ok((mut batch, response)) => {
                    retries = 0;
                    items.append(&mut batch);

                    match response.meta.pagination {
                        Some(pagination) if pagination.next_page != 0 => {
                            page = pagination.next_page;
                        }
                        _ => return Ok(items),
                    }
                }
            }
        }
    }
}
