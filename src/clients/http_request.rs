//! HTTP request types for the API client.
//!
//! This module provides the [`ApiRequest`] type and its builder for
//! constructing requests against the API.

use std::fmt;

use crate::clients::errors::InvalidRequestError;

/// HTTP methods supported by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and triggering actions.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// An HTTP request to be sent to the API.
///
/// Use [`ApiRequest::builder`] to construct requests with the builder
/// pattern. A request is owned transiently per call and not retained by
/// the client.
///
/// # Example
///
/// ```rust
/// use hcloud_api::clients::{ApiRequest, HttpMethod};
/// use serde_json::json;
///
/// // GET request
/// let get_request = ApiRequest::builder(HttpMethod::Get, "/servers")
///     .query_param("page", "2")
///     .build()
///     .unwrap();
///
/// // POST request with JSON body
/// let post_request = ApiRequest::builder(HttpMethod::Post, "/ssh_keys")
///     .body(json!({"name": "my key", "public_key": "ssh-rsa AAAA..."}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The path relative to the API endpoint, starting with `/`.
    pub path: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters to append to the URL.
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a new builder for constructing an `ApiRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> ApiRequestBuilder {
        ApiRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::MissingBody`] if the method is
    /// `Post` or `Put` but no body is set.
    pub fn verify(&self) -> Result<(), InvalidRequestError> {
        if matches!(self.method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidRequestError::MissingBody {
                method: self.method.to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for constructing [`ApiRequest`] instances.
#[derive(Debug)]
pub struct ApiRequestBuilder {
    method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
}

impl ApiRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a batch of query parameters.
    #[must_use]
    pub fn query_params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    /// Builds the [`ApiRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the request fails validation.
    pub fn build(self) -> Result<ApiRequest, InvalidRequestError> {
        let request = ApiRequest {
            method: self.method,
            path: self.path,
            body: self.body,
            query: self.query,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Put.to_string(), "put");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = ApiRequest::builder(HttpMethod::Get, "/servers")
            .build()
            .unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/servers");
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_builder_creates_valid_post_request() {
        let request = ApiRequest::builder(HttpMethod::Post, "/ssh_keys")
            .body(json!({"name": "key"}))
            .build()
            .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.body.is_some());
    }

    #[test]
    fn test_verify_requires_body_for_post() {
        let result = ApiRequest::builder(HttpMethod::Post, "/ssh_keys").build();

        assert!(matches!(
            result,
            Err(InvalidRequestError::MissingBody { method }) if method == "post"
        ));
    }

    #[test]
    fn test_verify_requires_body_for_put() {
        let result = ApiRequest::builder(HttpMethod::Put, "/ssh_keys/1").build();

        assert!(matches!(
            result,
            Err(InvalidRequestError::MissingBody { method }) if method == "put"
        ));
    }

    #[test]
    fn test_delete_needs_no_body() {
        let request = ApiRequest::builder(HttpMethod::Delete, "/ssh_keys/1")
            .build()
            .unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn test_builder_collects_query_params_in_order() {
        let request = ApiRequest::builder(HttpMethod::Get, "/servers")
            .query_param("page", "1")
            .query_params(vec![("per_page".to_string(), "50".to_string())])
            .build()
            .unwrap();

        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("per_page".to_string(), "50".to_string()),
            ]
        );
    }
}
