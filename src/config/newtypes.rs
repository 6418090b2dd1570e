//! Validated newtype wrappers for configuration values.
//!
//! Values are validated on construction, so a [`RenderConfig`](super::RenderConfig)
//! can never hold an empty API key or a base URL without a host.

use super::DEFAULT_BASE_URL;
use crate::error::ConfigError;
use std::fmt;

/// A validated Render API key.
///
/// The key is sent as a bearer token on every request. Its `Debug` output is
/// masked so configurations can be logged without leaking credentials.
///
/// # Example
///
/// ```rust
/// use render_api::ApiKey;
///
/// let key = ApiKey::new("rnd_abc123").unwrap();
/// assert_eq!(key.as_ref(), "rnd_abc123");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty or whitespace.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }

    /// Returns the value of the `Authorization` header for this key.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated API base URL (e.g., `https://api.render.com/v1`).
///
/// Request paths are appended verbatim, so any trailing `/` is trimmed on
/// construction.
///
/// # Example
///
/// ```rust
/// use render_api::BaseUrl;
///
/// let url = BaseUrl::new("https://api.render.com/v1/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.render.com/v1");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "api.render.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme or
    /// no host, or if it carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(invalid());
        }

        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);
        if host_end == host_start {
            return Err(invalid());
        }

        // Paths and query strings are appended per request.
        if url[host_start..].contains(['?', '#']) {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        // "https" + "://" + "api.render.com"
        Self {
            url: DEFAULT_BASE_URL.to_string(),
            scheme_end: 5,
            host_start: 8,
            host_end: 22,
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
