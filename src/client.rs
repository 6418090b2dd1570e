//! The [`RenderClient`] facade.

use std::sync::Arc;

use crate::clients::HttpClient;
use crate::config::RenderConfig;
use crate::error::ConfigError;
use crate::rest::resources::{EnvironmentsResource, EventsResource, ProjectsResource, UsersResource};
use crate::rest::Resource;

/// Entry point for the Render API.
///
/// Every resource shares one [`HttpClient`], and with it one connection pool
/// and one immutable configuration.
///
/// # Example
///
/// ```rust,ignore
/// use render_api::{ApiKey, RenderClient, RenderConfig};
///
/// let client = RenderClient::new(RenderConfig::new(ApiKey::new("rnd_abc123")?))?;
///
/// let me = client.users().me().await?;
/// println!("Authenticated as {}", me.email);
/// ```
#[derive(Clone, Debug)]
pub struct RenderClient {
    config: RenderConfig,
    http: Arc<HttpClient>,
    users: UsersResource,
    projects: ProjectsResource,
    environments: EnvironmentsResource,
    events: EventsResource,
}

// Verify RenderClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RenderClient>();
};

impl RenderClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the HTTP client cannot be
    /// created.
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        let http = Arc::new(HttpClient::new(&config)?);
        let base = Resource::new(Arc::clone(&http));

        tracing::debug!(base_url = %config.base_url(), "Created Render API client");

        Ok(Self {
            config,
            users: UsersResource::new(base.clone()),
            projects: ProjectsResource::new(base.clone()),
            environments: EnvironmentsResource::new(base.clone()),
            events: EventsResource::new(base),
            http,
        })
    }

    /// Creates a client from `RENDER_API_KEY` and, if set, `RENDER_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(RenderConfig::from_env()?)
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Returns the shared transport, for endpoints without a typed resource.
    #[must_use]
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// The `/users` endpoint.
    #[must_use]
    pub const fn users(&self) -> &UsersResource {
        &self.users
    }

    /// The `/projects` endpoints.
    #[must_use]
    pub const fn projects(&self) -> &ProjectsResource {
        &self.projects
    }

    /// The `/environments` endpoints.
    #[must_use]
    pub const fn environments(&self) -> &EnvironmentsResource {
        &self.environments
    }

    /// The `/events` endpoint.
    #[must_use]
    pub const fn events(&self) -> &EventsResource {
        &self.events
    }
}
