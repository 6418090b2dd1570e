//! HTTP request types for the Render API client.
//!
//! This module provides the [`HttpRequest`] descriptor and its builder.

use std::fmt;
use std::time::Duration;

/// HTTP methods supported by the Render API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    pub(crate) const fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A scalar query parameter value.
///
/// Arrays are not supported; callers join them before building the request
/// (e.g. `ownerId=a,b`).
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    /// A string value, percent-encoded on the wire.
    String(String),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A boolean, sent as `true` / `false`.
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::UInt(u64::from(value))
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<usize> for QueryValue {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A request to be sent to the Render API.
///
/// Use [`HttpRequest::builder`] to construct requests. A built request is
/// never modified by the transport, so it can be reused across attempts.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use render_api::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let list = HttpRequest::builder(HttpMethod::Get, "/projects")
///     .query_param("limit", 20)
///     .query_param_opt("cursor", None::<String>)
///     .build();
/// assert_eq!(list.query.len(), 1);
///
/// let create = HttpRequest::builder(HttpMethod::Post, "/projects")
///     .body(json!({"name": "demo"}))
///     .timeout(Duration::from_secs(5))
///     .build();
/// assert!(create.body.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path appended to the base URL (e.g., `/projects/prj-123`).
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, QueryValue)>,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Headers merged over the defaults.
    pub headers: Vec<(String, String)>,
    /// Per-attempt timeout override.
    pub timeout: Option<Duration>,
    /// Disables retries for this request.
    pub skip_retry: bool,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Serializes the query parameters as `?k=v&...`, or an empty string.
    #[must_use]
    pub fn query_string(&self) -> String {
        if self.query.is_empty() {
            return String::new();
        }
        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value.to_string())
                )
            })
            .collect();
        format!("?{}", pairs.join("&"))
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    query: Vec<(String, QueryValue)>,
    body: Option<serde_json::Value>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    skip_retry: bool,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            timeout: None,
            skip_retry: false,
        }
    }

    /// Adds a query parameter. A repeated key replaces the earlier value in
    /// place.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.query.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.query.push((key, value));
        }
        self
    }

    /// Adds a query parameter when `value` is `Some`.
    #[must_use]
    pub fn query_param_opt<V: Into<QueryValue>>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a header that overrides any default of the same name.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Overrides the client's per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables retries: the first failure is returned as-is.
    #[must_use]
    pub const fn skip_retry(mut self, skip: bool) -> Self {
        self.skip_retry = skip;
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            http_method: self.http_method,
            path: self.path,
            query: self.query,
            body: self.body,
            headers: self.headers,
            timeout: self.timeout,
            skip_retry: self.skip_retry,
        }
    }
}
