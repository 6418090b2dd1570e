//! Configuration types for the Render API client.
//!
//! # Overview
//!
//! - [`RenderConfig`]: Immutable client configuration
//! - [`RenderConfigBuilder`]: Builder for constructing [`RenderConfig`] instances
//! - [`ApiKey`]: A validated API key with masked debug output
//! - [`BaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use render_api::{ApiKey, RenderConfig};
//!
//! let config = RenderConfig::builder()
//!     .api_key(ApiKey::new("rnd_abc123").unwrap())
//!     .timeout(Duration::from_secs(60))
//!     .max_retries(5)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.render.com/v1");
//! ```

mod newtypes;

pub use newtypes::{ApiKey, BaseUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Default base URL of the Render API.
pub const DEFAULT_BASE_URL: &str = "https://api.render.com/v1";

/// Default per-attempt timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry, in milliseconds.
pub const DEFAULT_INITIAL_RETRY_DELAY_MS: u64 = 1_000;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "RENDER_API_KEY";

/// Environment variable holding an optional base URL override.
pub const BASE_URL_ENV: &str = "RENDER_BASE_URL";

/// Configuration for the Render API client.
///
/// Set once at construction and never mutated afterwards; every request made
/// through a client shares the same configuration.
///
/// # Timeouts and retries
///
/// `timeout` bounds a single attempt, not the whole operation. A request that
/// is retried `max_retries` times can therefore take up to
/// `(max_retries + 1) * timeout` plus the backoff delays.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    api_key: ApiKey,
    base_url: BaseUrl,
    timeout: Duration,
    max_retries: u32,
    initial_retry_delay: Duration,
    user_agent_prefix: Option<String>,
}

impl RenderConfig {
    /// Creates a new builder for constructing a `RenderConfig`.
    #[must_use]
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }

    /// Creates a configuration with default settings for the given key.
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: BaseUrl::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_retry_delay: Duration::from_millis(DEFAULT_INITIAL_RETRY_DELAY_MS),
            user_agent_prefix: None,
        }
    }

    /// Loads a configuration from `RENDER_API_KEY` and, if set,
    /// `RENDER_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if the API key variable is not
    /// set, or a validation error for an empty key or a malformed URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ConfigError::MissingEnvVar { name: API_KEY_ENV })?;

        let mut builder = Self::builder().api_key(ApiKey::new(api_key)?);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(BaseUrl::new(base_url)?);
        }
        builder.build()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the default number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn initial_retry_delay(&self) -> Duration {
        self.initial_retry_delay
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify RenderConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RenderConfig>();
};

/// Builder for constructing [`RenderConfig`] instances.
///
/// Only `api_key` is required.
///
/// # Defaults
///
/// - `base_url`: `https://api.render.com/v1`
/// - `timeout`: 30 seconds
/// - `max_retries`: 3
/// - `initial_retry_delay`: 1 second
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct RenderConfigBuilder {
    api_key: Option<ApiKey>,
    base_url: Option<BaseUrl>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    initial_retry_delay: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl RenderConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the default per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets the delay before the first retry. Later retries double it.
    #[must_use]
    pub const fn initial_retry_delay(mut self, delay: Duration) -> Self {
        self.initial_retry_delay = Some(delay);
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`RenderConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set.
    pub fn build(self) -> Result<RenderConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        Ok(RenderConfig {
            api_key,
            base_url: self.base_url.unwrap_or_default(),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            initial_retry_delay: self
                .initial_retry_delay
                .unwrap_or(Duration::from_millis(DEFAULT_INITIAL_RETRY_DELAY_MS)),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> ApiKey {
        ApiKey::new("rnd_test_key").unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = RenderConfigBuilder::new().max_retries(1).build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = RenderConfig::builder().api_key(test_key()).build().unwrap();

        assert_eq!(config.base_url().as_ref(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.initial_retry_delay(), Duration::from_secs(1));
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_default_base_url_matches_parsed_form() {
        let parsed = BaseUrl::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(BaseUrl::default(), parsed);
        assert_eq!(BaseUrl::default().host_name(), "api.render.com");
    }

    #[test]
    fn test_new_matches_builder_defaults() {
        let from_new = RenderConfig::new(test_key());
        let from_builder = RenderConfig::builder().api_key(test_key()).build().unwrap();

        assert_eq!(from_new.base_url(), from_builder.base_url());
        assert_eq!(from_new.timeout(), from_builder.timeout());
        assert_eq!(from_new.max_retries(), from_builder.max_retries());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let base_url = BaseUrl::new("https://custom.api.render.com/v1").unwrap();

        let config = RenderConfig::builder()
            .api_key(test_key())
            .base_url(base_url.clone())
            .timeout(Duration::from_secs(60))
            .max_retries(5)
            .initial_retry_delay(Duration::from_millis(250))
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(config.base_url(), &base_url);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.initial_retry_delay(), Duration::from_millis(250));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_config_debug_does_not_leak_api_key() {
        let config = RenderConfig::new(test_key());
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("RenderConfig"));
        assert!(!debug_str.contains("rnd_test_key"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RenderConfig>();
    }
}
