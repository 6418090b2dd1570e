//! Configuration error types for the Render API client.
//!
//! All configuration and client constructors return `Result<T, ConfigError>`
//! so that an invalid API key or base URL is rejected before any request is
//! made.
//!
//! # Example
//!
//! ```rust
//! use render_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Render API key.")]
    EmptyApiKey,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme and host (e.g., 'https://api.render.com/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Environment variable '{name}' is not set.")]
    MissingEnvVar {
        /// The name of the variable.
        name: &'static str,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to create HTTP client: {message}")]
    HttpClientBuild {
        /// The reason reported by the HTTP stack.
        message: String,
    },
}
