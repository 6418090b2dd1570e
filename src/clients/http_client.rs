//! HTTP transport for Render API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the Render API with per-attempt timeouts and automatic retry
//! handling.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};

use crate::clients::errors::{ApiErrorBody, RenderError};
use crate::clients::http_request::{HttpMethod, HttpRequest, QueryValue};
use crate::clients::http_response::{parse_retry_after, HttpResponse};
use crate::config::{ApiKey, RenderConfig};
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Computes the delay before retry number `attempt + 1`.
///
/// A non-zero `retry_after` hint wins; otherwise the delay doubles from
/// `initial` on every attempt. Saturates instead of overflowing.
#[must_use]
pub fn retry_delay(initial: Duration, attempt: u32, retry_after: Option<u64>) -> Duration {
    match retry_after {
        Some(secs) if secs > 0 => Duration::from_secs(secs),
        _ => initial.saturating_mul(2u32.saturating_pow(attempt)),
    }
}

/// HTTP client for making requests to the Render API.
///
/// The client handles:
/// - URL construction from the configured base URL, path and query
/// - Default headers (`Authorization`, `Accept`, `User-Agent`)
/// - A per-attempt timeout
/// - Retries with exponential backoff for 429, 500, 503, timeouts and
///   connectivity failures
/// - Classification of every failure into a [`RenderError`]
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`; share it across tasks through an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use render_api::clients::HttpClient;
/// use render_api::{ApiKey, RenderConfig};
///
/// let config = RenderConfig::new(ApiKey::new("rnd_abc123")?);
/// let client = HttpClient::new(&config)?;
///
/// let response = client.get("/users", &[]).await?;
/// println!("{:?}", response.data);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
    user_agent: String,
    timeout: Duration,
    max_retries: u32,
    initial_retry_delay: Duration,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the underlying reqwest
    /// client cannot be created (e.g., TLS initialization failure).
    pub fn new(config: &RenderConfig) -> Result<Self, ConfigError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}render-api-rust/{SDK_VERSION}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| ConfigError::HttpClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().as_ref().to_string(),
            api_key: config.api_key().clone(),
            user_agent,
            timeout: config.timeout(),
            max_retries: config.max_retries(),
            initial_retry_delay: config.initial_retry_delay(),
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the default per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Builds the full URL for a request.
    #[must_use]
    pub fn build_url(&self, request: &HttpRequest) -> String {
        format!("{}{}{}", self.base_url, request.path, request.query_string())
    }

    /// Builds the headers for a request: defaults first, then the request's
    /// own headers, which replace defaults of the same name.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidRequest`](crate::ErrorKind::InvalidRequest) error
    /// for a header name or value that cannot be sent.
    pub fn build_headers(&self, request: &HttpRequest) -> Result<HeaderMap, RenderError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(&self.api_key.bearer())?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, header_value(&self.user_agent)?);
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                RenderError::invalid_request(format!("Invalid header name: {key}"))
            })?;
            headers.insert(name, header_value(value)?);
        }

        Ok(headers)
    }

    /// Sends a request to the Render API.
    ///
    /// Each attempt is bounded by the request's timeout override, or the
    /// client default. Retryable failures (429, 500, 503, timeouts,
    /// connectivity errors) are retried up to `max_retries` times unless the
    /// request disables retries; the last failure is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] whose kind describes the failure:
    /// - a status kind (`NotFound`, `RateLimit`, ...) for non-2xx responses
    /// - `Timeout` when an attempt exceeds its duration
    /// - `Network` for connectivity failures
    /// - `Decode` for a 2xx body that is not JSON
    /// - `InvalidRequest` for headers that cannot be sent
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RenderError> {
        let url = self.build_url(&request);
        let headers = self.build_headers(&request)?;
        let attempt_timeout = request.timeout.unwrap_or(self.timeout);

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            tracing::debug!(
                method = %request.http_method,
                url = %url,
                attempt = attempt + 1,
                "Sending Render API request"
            );

            let result = tokio::time::timeout(
                attempt_timeout,
                self.send_once(request.http_method, &url, &headers, request.body.as_ref()),
            )
            .await
            .unwrap_or_else(|_| Err(RenderError::timeout(attempt_timeout)));

            let error = match result {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            let can_retry = !request.skip_retry && attempt < self.max_retries;
            if !can_retry || !error.is_retryable() {
                return Err(error);
            }

            let delay = retry_delay(self.initial_retry_delay, attempt, error.retry_after());
            tracing::warn!(
                method = %request.http_method,
                url = %url,
                attempt = attempt + 1,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Retrying Render API request"
            );
            last_error = Some(error);
            tokio::time::sleep(delay).await;
        }

        Err(last_error
            .unwrap_or_else(|| RenderError::network("Request failed after all retries", None)))
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, QueryValue)],
    ) -> Result<HttpResponse, RenderError> {
        let request = query
            .iter()
            .fold(HttpRequest::builder(HttpMethod::Get, path), |builder, (k, v)| {
                builder.query_param(*k, v.clone())
            })
            .build();
        self.execute(request).await
    }

    /// Sends a POST request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn post(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, RenderError> {
        self.execute(with_body(HttpMethod::Post, path, body)).await
    }

    /// Sends a PUT request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn put(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, RenderError> {
        self.execute(with_body(HttpMethod::Put, path, body)).await
    }

    /// Sends a PATCH request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn patch(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, RenderError> {
        self.execute(with_body(HttpMethod::Patch, path, body)).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn delete(&self, path: &str) -> Result<HttpResponse, RenderError> {
        self.execute(HttpRequest::builder(HttpMethod::Delete, path).build())
            .await
    }

    /// Performs a single attempt: send, read the body, classify.
    async fn send_once(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpResponse, RenderError> {
        let mut builder = self
            .client
            .request(method.as_reqwest(), url)
            .headers(headers.clone());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let res = builder.send().await?;

        let status = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let request_id = res_headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .cloned();
        let success = (200..300).contains(&status);

        tracing::debug!(status, url = %url, "Received Render API response");

        // An unreadable error body still yields the status-based error.
        let body_text = match res.text().await {
            Ok(text) => text,
            Err(e) if !success => {
                tracing::debug!(status, error = %e, "Failed to read error response body");
                String::new()
            }
            Err(e) => return Err(RenderError::from(e).with_request_id(request_id)),
        };

        if success {
            if status == 204 || body_text.trim().is_empty() {
                return Ok(HttpResponse::new(status, res_headers, None));
            }
            let data = serde_json::from_str::<serde_json::Value>(&body_text).map_err(|e| {
                RenderError::decode(
                    format!("Failed to parse response body as JSON: {e}"),
                    Some(Box::new(e)),
                )
                .with_request_id(request_id)
            })?;
            return Ok(HttpResponse::new(status, res_headers, Some(data)));
        }

        let error_body = ApiErrorBody::parse(&body_text);
        let retry_after = res_headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| parse_retry_after(value));
        let message = error_body
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        Err(RenderError::from_status(
            status,
            message,
            error_body,
            request_id,
            retry_after,
        ))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RenderError> {
    HeaderValue::from_str(value)
        .map_err(|_| RenderError::invalid_request("Invalid header value".to_string()))
}

fn with_body(method: HttpMethod, path: &str, body: Option<serde_json::Value>) -> HttpRequest {
    let builder = HttpRequest::builder(method, path);
    match body {
        Some(body) => builder.body(body),
        None => builder,
    }
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;
    use crate::ErrorKind;

    fn create_test_client() -> HttpClient {
        let config = RenderConfig::new(ApiKey::new("rnd_test_key").unwrap());
        HttpClient::new(&config).unwrap()
    }

    #[test]
    fn test_client_uses_config_defaults() {
        let client = create_test_client();

        assert_eq!(client.base_url(), "https://api.render.com/v1");
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert_eq!(client.max_retries(), 3);
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = create_test_client();
        assert_eq!(
            client.user_agent(),
            format!("render-api-rust/{SDK_VERSION}")
        );
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = RenderConfig::builder()
            .api_key(ApiKey::new("rnd_test_key").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        assert!(client.user_agent().starts_with("MyApp/1.0 | "));
        assert!(client.user_agent().contains("render-api-rust/"));
    }

    #[test]
    fn test_default_headers() {
        let client = create_test_client();
        let request = HttpRequest::builder(HttpMethod::Get, "/users").build();
        let headers = client.build_headers(&request).unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer rnd_test_key");
        assert_eq!(headers[ACCEPT], "application/json");
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_content_type_only_with_body() {
        let client = create_test_client();
        let request = HttpRequest::builder(HttpMethod::Post, "/projects")
            .body(serde_json::json!({"name": "demo"}))
            .build();
        let headers = client.build_headers(&request).unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_caller_headers_override_defaults_case_insensitively() {
        let client = create_test_client();
        let request = HttpRequest::builder(HttpMethod::Get, "/users")
            .header("accept", "text/plain")
            .header("X-Custom", "1")
            .build();
        let headers = client.build_headers(&request).unwrap();

        assert_eq!(headers.get_all(ACCEPT).iter().count(), 1);
        assert_eq!(headers[ACCEPT], "text/plain");
        assert_eq!(headers["x-custom"], "1");
    }

    #[test]
    fn test_invalid_header_is_invalid_request() {
        let client = create_test_client();
        let request = HttpRequest::builder(HttpMethod::Get, "/users")
            .header("bad header", "x")
            .build();

        let error = client.build_headers(&request).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidRequest);

        let request = HttpRequest::builder(HttpMethod::Get, "/users")
            .header("X-Ok", "line\nbreak")
            .build();
        let error = client.build_headers(&request).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_build_url_appends_path_and_query() {
        let config = RenderConfig::builder()
            .api_key(ApiKey::new("rnd_test_key").unwrap())
            .base_url(BaseUrl::new("http://localhost:8080/v1/").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let request = HttpRequest::builder(HttpMethod::Get, "/projects")
            .query_param("limit", 20)
            .query_param("cursor", "abc=")
            .build();
        assert_eq!(
            client.build_url(&request),
            "http://localhost:8080/v1/projects?limit=20&cursor=abc%3D"
        );

        let request = HttpRequest::builder(HttpMethod::Get, "/users").build();
        assert_eq!(client.build_url(&request), "http://localhost:8080/v1/users");
    }

    #[test]
    fn test_retry_delay_exponential() {
        let initial = Duration::from_secs(1);
        assert_eq!(retry_delay(initial, 0, None), Duration::from_secs(1));
        assert_eq!(retry_delay(initial, 1, None), Duration::from_secs(2));
        assert_eq!(retry_delay(initial, 2, None), Duration::from_secs(4));
        assert_eq!(retry_delay(initial, 3, None), Duration::from_secs(8));
    }

    #[test]
    fn test_retry_delay_uses_retry_after_hint() {
        let initial = Duration::from_secs(1);
        assert_eq!(retry_delay(initial, 0, Some(30)), Duration::from_secs(30));
        assert_eq!(retry_delay(initial, 2, Some(30)), Duration::from_secs(30));
        assert_eq!(retry_delay(initial, 2, Some(0)), Duration::from_secs(4));
    }

    #[test]
    fn test_retry_delay_saturates() {
        let delay = retry_delay(Duration::from_secs(1), 200, None);
        assert_eq!(delay, Duration::from_secs(1).saturating_mul(u32::MAX));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
