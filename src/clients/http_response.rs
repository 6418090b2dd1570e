//! HTTP response types for the Render API client.
//!
//! This module provides the [`HttpResponse`] envelope returned by the
//! transport for every successful call.

use std::collections::HashMap;

/// Parses a `retry-after` header value as whole seconds.
///
/// Only the leading digits count, so `"1.5"` is 1 and `"30s"` is 30.
/// Returns `None` when there are no leading digits or the value is zero,
/// so callers fall back to exponential backoff. HTTP-date values are not
/// supported.
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value, |end| &value[..end]);
    digits.parse::<u64>().ok().filter(|secs| *secs > 0)
}

/// A successful response from the Render API.
///
/// `T` is the payload type; the transport returns raw JSON
/// (`serde_json::Value`) and resources convert it into typed models.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use render_api::clients::HttpResponse;
/// use serde_json::json;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-request-id".to_string(), vec!["req_1".to_string()]);
///
/// let response = HttpResponse::new(200, headers, Some(json!({"email": "a@b.c"})));
/// assert_eq!(response.request_id(), Some("req_1"));
/// assert!(response.is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse<T = serde_json::Value> {
    /// The response payload. `None` for 204 and empty bodies.
    pub data: Option<T>,
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lower-cased name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
}

impl<T> HttpResponse<T> {
    /// Creates a new response envelope.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, Vec<String>>, data: Option<T>) -> Self {
        Self {
            data,
            status,
            headers,
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `x-request-id` header value, if present.
    ///
    /// Include this id when reporting problems to Render support.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `retry-after` hint in whole seconds, if present.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        self.header("retry-after").and_then(parse_retry_after)
    }
}
