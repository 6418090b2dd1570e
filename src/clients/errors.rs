//! Error types for Render API requests.
//!
//! Every failure surfaced by the transport or the resource layer is a single
//! [`RenderError`] tagged with an [`ErrorKind`]. HTTP failures keep the status
//! code, the provider's structured error body and the `x-request-id` header so
//! callers can correlate with Render support.
//!
//! # Status mapping
//!
//! | Status | Kind |
//! |---|---|
//! | 400 | [`ErrorKind::BadRequest`] |
//! | 401 | [`ErrorKind::Auth`] |
//! | 402 | [`ErrorKind::PaymentRequired`] |
//! | 403 | [`ErrorKind::Forbidden`] |
//! | 404 | [`ErrorKind::NotFound`] |
//! | 406 | [`ErrorKind::NotAcceptable`] |
//! | 409 | [`ErrorKind::Conflict`] |
//! | 410 | [`ErrorKind::Gone`] |
//! | 429 | [`ErrorKind::RateLimit`] |
//! | 500 | [`ErrorKind::Server`] |
//! | 503 | [`ErrorKind::ServiceUnavailable`] |
//! | other | [`ErrorKind::Api`] |
//!
//! # Example
//!
//! ```rust,ignore
//! use render_api::{ErrorKind, RenderError};
//!
//! match client.projects().retrieve("prj-123").await {
//!     Ok(project) => println!("{}", project.name),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("gone"),
//!     Err(e) if e.kind() == ErrorKind::RateLimit => {
//!         println!("retry after {:?}s (request {:?})", e.retry_after(), e.request_id());
//!     }
//!     Err(e) => println!("error: {e}"),
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed source error carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The category of a [`RenderError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 400.
    BadRequest,
    /// HTTP 401, invalid or missing API key.
    Auth,
    /// HTTP 402.
    PaymentRequired,
    /// HTTP 403.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 406.
    NotAcceptable,
    /// HTTP 409.
    Conflict,
    /// HTTP 410.
    Gone,
    /// HTTP 429. Carries the `retry-after` hint when the server sent one.
    RateLimit,
    /// HTTP 500.
    Server,
    /// HTTP 503.
    ServiceUnavailable,
    /// Any other non-2xx status.
    Api,
    /// Connectivity failure (DNS, connection refused, reset, ...).
    Network,
    /// An attempt exceeded its configured duration.
    Timeout,
    /// A response payload did not match the expected model.
    Validation,
    /// A successful response body was not valid JSON.
    Decode,
    /// The request could not be built (e.g. an invalid header).
    InvalidRequest,
}

impl ErrorKind {
    /// Maps an HTTP status code to its error kind.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Auth,
            402 => Self::PaymentRequired,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            406 => Self::NotAcceptable,
            409 => Self::Conflict,
            410 => Self::Gone,
            429 => Self::RateLimit,
            500 => Self::Server,
            503 => Self::ServiceUnavailable,
            _ => Self::Api,
        }
    }

    /// Returns `true` if the transport retries failures of this kind.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::Server | Self::ServiceUnavailable | Self::Network | Self::Timeout
        )
    }

    /// Returns a stable, machine-readable code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Auth => "AUTH",
            Self::PaymentRequired => "PAYMENT_REQUIRED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::NotAcceptable => "NOT_ACCEPTABLE",
            Self::Conflict => "CONFLICT",
            Self::Gone => "GONE",
            Self::RateLimit => "RATE_LIMIT",
            Self::Server => "SERVER",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Api => "API",
            Self::Network => "NETWORK",
            Self::Timeout => "TIMEOUT",
            Self::Validation => "VALIDATION",
            Self::Decode => "DECODE",
            Self::InvalidRequest => "INVALID_REQUEST",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured error body returned by the Render API.
///
/// All fields are optional; unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Provider error identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error type, when the provider sends one.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ApiErrorBody {
    /// Parses an error body, tolerating empty or malformed input.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        serde_json::from_str(text).ok()
    }
}

/// Error returned by every Render API operation.
///
/// Use [`kind`](Self::kind) to branch on the failure category. Fields that do
/// not apply to a kind are `None` (a `Network` error has no status, only a
/// `Timeout` error has a timeout).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RenderError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    response: Option<ApiErrorBody>,
    request_id: Option<String>,
    retry_after: Option<u64>,
    timeout: Option<Duration>,
    #[source]
    source: Option<BoxError>,
}

impl RenderError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            response: None,
            request_id: None,
            retry_after: None,
            timeout: None,
            source: None,
        }
    }

    /// Creates the error for a non-2xx response.
    ///
    /// The kind is derived from `status`.
    #[must_use]
    pub fn from_status(
        status: u16,
        message: impl Into<String>,
        response: Option<ApiErrorBody>,
        request_id: Option<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self {
            status: Some(status),
            response,
            request_id,
            retry_after,
            ..Self::new(ErrorKind::from_status(status), message)
        }
    }

    /// Creates a connectivity error.
    #[must_use]
    pub fn network(message: impl Into<String>, source: Option<BoxError>) -> Self {
        Self {
            source,
            ..Self::new(ErrorKind::Network, message)
        }
    }

    /// Creates a timeout error for an attempt bounded by `timeout`.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::new(
                ErrorKind::Timeout,
                format!("Request timed out after {}ms", timeout.as_millis()),
            )
        }
    }

    /// Creates a validation error for a payload that does not match its model.
    #[must_use]
    pub fn validation(message: impl Into<String>, source: Option<BoxError>) -> Self {
        Self {
            source,
            ..Self::new(ErrorKind::Validation, message)
        }
    }

    /// Creates a decode error for a successful response that is not JSON.
    #[must_use]
    pub fn decode(message: impl Into<String>, source: Option<BoxError>) -> Self {
        Self {
            source,
            ..Self::new(ErrorKind::Decode, message)
        }
    }

    /// Creates an error for a request that could not be built.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Sets the request id, keeping any existing one.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        if self.request_id.is_none() {
            self.request_id = request_id;
        }
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, for errors produced by a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the structured error body sent by the API, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&ApiErrorBody> {
        self.response.as_ref()
    }

    /// Returns the `x-request-id` of the failing response, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the `retry-after` hint in seconds, if the server sent one.
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }

    /// Returns the attempt duration that was exceeded, for timeout errors.
    #[must_use]
    pub const fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns `true` if the transport would retry this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::invalid_request(format!("Invalid request: {err}"))
        } else if err.is_timeout() {
            Self {
                source: Some(Box::new(err)),
                ..Self::new(ErrorKind::Timeout, "Request timed out")
            }
        } else if err.is_decode() {
            let message = format!("Failed to decode response body: {err}");
            Self::decode(message, Some(Box::new(err)))
        } else {
            let message = format!("Network error: {err}");
            Self::network(message, Some(Box::new(err)))
        }
    }
}
