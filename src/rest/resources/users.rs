//! User resource implementation.
//!
//! Exposes the user that owns the API key.

use serde::{Deserialize, Serialize};

use crate::clients::RenderError;
use crate::rest::resource::Resource;

/// The authenticated Render user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's display name, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The user's email address.
    pub email: String,
}

/// Client for the `/users` endpoint.
#[derive(Clone, Debug)]
pub struct UsersResource {
    base: Resource,
}

impl UsersResource {
    /// Creates the resource over a shared transport.
    #[must_use]
    pub const fn new(base: Resource) -> Self {
        Self { base }
    }

    /// Gets the user that owns the API key.
    ///
    /// # Errors
    ///
    /// Returns an `Auth` error for an invalid key, or another transport or
    /// `Validation` error.
    pub async fn me(&self) -> Result<User, RenderError> {
        let response = self.base.http().get("/users", &[]).await?;
        Resource::parse(response)
    }
}
