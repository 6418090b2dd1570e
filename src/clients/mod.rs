//! HTTP transport types for Render API communication.
//!
//! This module provides the foundational HTTP layer for making authenticated
//! requests to the Render API. It handles request construction, per-attempt
//! timeouts, retry logic and the classification of failures.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A successful response envelope
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`QueryValue`]: Scalar query parameter values
//! - [`RenderError`] / [`ErrorKind`]: The error type shared by every operation
//!
//! # Example
//!
//! ```rust,ignore
//! use render_api::clients::{HttpClient, HttpMethod, HttpRequest};
//! use render_api::{ApiKey, RenderConfig};
//!
//! let config = RenderConfig::new(ApiKey::new("rnd_abc123")?);
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/projects")
//!     .query_param("limit", 50)
//!     .build();
//!
//! let response = client.execute(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **429, 500, 503**: Retried. A `retry-after` header (whole seconds) sets
//!   the delay; otherwise the delay doubles from the initial retry delay
//!   (1s, 2s, 4s, ...)
//! - **Timeouts and connectivity failures**: Retried with the same backoff
//! - **Other statuses**: Returned immediately without retry
//!
//! The default is 3 retries after the first attempt. Configure it with
//! [`RenderConfigBuilder::max_retries`](crate::RenderConfigBuilder::max_retries),
//! or disable retries per request with
//! [`HttpRequestBuilder::skip_retry`].

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{ApiErrorBody, BoxError, ErrorKind, RenderError};
pub use http_client::{retry_delay, HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, QueryValue};
pub use http_response::{parse_retry_after, HttpResponse};
