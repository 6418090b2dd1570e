//! Environment resource implementation.
//!
//! Environments partition a project (e.g. `production`, `staging`) and hold
//! its services, databases and env groups.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use render_api::rest::resources::ListEnvironmentsParams;
//! use render_api::pagination::AutoPaginateOptions;
//!
//! let params = ListEnvironmentsParams::default().project_id("prj-123");
//! let mut environments = client
//!     .environments()
//!     .list_all(&params, AutoPaginateOptions::default());
//!
//! while let Some(environment) = environments.next().await {
//!     let environment = environment?;
//!     println!("{} [{:?}]", environment.name, environment.protected_status);
//! }
//!
//! client
//!     .environments()
//!     .add_resources("evm-123", &["srv-abc", "dpg-def"])
//!     .await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{HttpMethod, HttpRequest, QueryValue, RenderError};
use crate::pagination::{
    fetch_one_page, paginate, AutoPaginateOptions, CursorItem, ItemStream, PaginatedResponse,
    PaginationParams,
};
use crate::rest::resource::{path_segment, Resource};
use crate::rest::resources::ProtectedStatus;

/// An environment within a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// The unique identifier (e.g., `evm-abc123`).
    pub id: String,
    /// The environment name.
    pub name: String,
    /// The project this environment belongs to.
    pub project_id: String,
    /// Whether the environment is protected.
    pub protected_status: ProtectedStatus,
    /// When the environment was created.
    pub created_at: DateTime<Utc>,
    /// When the environment was last updated.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnvironmentWithCursor {
    cursor: String,
    environment: Environment,
}

impl From<EnvironmentWithCursor> for CursorItem<Environment> {
    fn from(wire: EnvironmentWithCursor) -> Self {
        Self::new(wire.cursor, wire.environment)
    }
}

/// Body of `POST /environments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentInput {
    /// The environment name.
    pub name: String,
    /// The project to create the environment in.
    pub project_id: String,
    /// Whether the environment is protected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_status: Option<ProtectedStatus>,
}

impl CreateEnvironmentInput {
    /// Creates an input with the default protection.
    #[must_use]
    pub fn new(name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project_id: project_id.into(),
            protected_status: None,
        }
    }
}

/// Body of `PATCH /environments/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvironmentInput {
    /// The new name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The new protection status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_status: Option<ProtectedStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceIdsInput<'a> {
    resource_ids: &'a [&'a str],
}

/// Filters for listing environments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEnvironmentsParams {
    /// Only environments of this project.
    pub project_id: Option<String>,
}

impl ListEnvironmentsParams {
    /// Filters by project.
    #[must_use]
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    fn to_query(&self) -> Vec<(String, QueryValue)> {
        self.project_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| ("projectId".to_string(), QueryValue::from(id)))
            .into_iter()
            .collect()
    }
}

/// Client for the `/environments` endpoints.
#[derive(Clone, Debug)]
pub struct EnvironmentsResource {
    base: Resource,
}

impl EnvironmentsResource {
    /// Creates the resource over a shared transport.
    #[must_use]
    pub const fn new(base: Resource) -> Self {
        Self { base }
    }

    /// Fetches one page of environments.
    ///
    /// # Errors
    ///
    /// Returns a transport or `Validation` error.
    pub async fn list(
        &self,
        params: &ListEnvironmentsParams,
        page: PaginationParams,
    ) -> Result<PaginatedResponse<Environment>, RenderError> {
        let fetch = self
            .base
            .page_fetcher::<EnvironmentWithCursor, Environment>("/environments", params.to_query());
        fetch_one_page(fetch, page).await
    }

    /// Lazily yields every environment matching `params`.
    #[must_use]
    pub fn list_all(
        &self,
        params: &ListEnvironmentsParams,
        options: AutoPaginateOptions,
    ) -> ItemStream<'static, Environment> {
        let fetch = self
            .base
            .page_fetcher::<EnvironmentWithCursor, Environment>("/environments", params.to_query());
        paginate(fetch, options)
    }

    /// Creates an environment.
    ///
    /// # Errors
    ///
    /// Returns a transport or `Validation` error.
    pub async fn create(&self, input: &CreateEnvironmentInput) -> Result<Environment, RenderError> {
        let body = Resource::to_body(input)?;
        let response = self.base.http().post("/environments", Some(body)).await?;
        Resource::parse(response)
    }

    /// Retrieves an environment by id.
    ///
    /// # Errors
    ///
    /// Returns a transport or `Validation` error.
    pub async fn retrieve(&self, environment_id: &str) -> Result<Environment, RenderError> {
        let path = format!("/environments/{}", path_segment(environment_id));
        let response = self.base.http().get(&path, &[]).await?;
        Resource::parse(response)
    }

    /// Updates an environment.
    ///
    /// # Errors
    ///
    /// Returns a transport or `Validation` error.
    pub async fn update(
        &self,
        environment_id: &str,
        input: &UpdateEnvironmentInput,
    ) -> Result<Environment, RenderError> {
        let path = format!("/environments/{}", path_segment(environment_id));
        let body = Resource::to_body(input)?;
        let response = self.base.http().patch(&path, Some(body)).await?;
        Resource::parse(response)
    }

    /// Deletes an environment.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn delete(&self, environment_id: &str) -> Result<(), RenderError> {
        let path = format!("/environments/{}", path_segment(environment_id));
        self.base.http().delete(&path).await?;
        Ok(())
    }

    /// Moves resources (services, databases, ...) into an environment.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn add_resources(
        &self,
        environment_id: &str,
        resource_ids: &[&str],
    ) -> Result<(), RenderError> {
        let path = format!("/environments/{}/resources", path_segment(environment_id));
        let body = Resource::to_body(&ResourceIdsInput { resource_ids })?;
        self.base.http().post(&path, Some(body)).await?;
        Ok(())
    }

    /// Removes resources from an environment.
    ///
    /// Sent as a `DELETE` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn remove_resources(
        &self,
        environment_id: &str,
        resource_ids: &[&str],
    ) -> Result<(), RenderError> {
        let path = format!("/environments/{}/resources", path_segment(environment_id));
        let body = Resource::to_body(&ResourceIdsInput { resource_ids })?;
        let request = HttpRequest::builder(HttpMethod::Delete, path)
            .body(body)
            .build();
        self.base.http().execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_environment_deserializes() {
        let environment: Environment = serde_json::from_value(json!({
            "id": "evm-1",
            "name": "production",
            "projectId": "prj-1",
            "protectedStatus": "not_protected",
            "createdAt": "2024-01-15T10:30:00Z",
            "updatedAt": "2024-01-15T10:30:00Z"
        }))
        .unwrap();

        assert_eq!(environment.project_id, "prj-1");
        assert_eq!(environment.protected_status, ProtectedStatus::NotProtected);
    }

    #[test]
    fn test_unknown_protected_status_is_rejected() {
        let result = serde_json::from_value::<Environment>(json!({
            "id": "evm-1",
            "name": "production",
            "projectId": "prj-1",
            "protectedStatus": "maybe",
            "createdAt": "2024-01-15T10:30:00Z",
            "updatedAt": "2024-01-15T10:30:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_resource_ids_body() {
        let body = Resource::to_body(&ResourceIdsInput {
            resource_ids: &["srv-1", "dpg-2"],
        })
        .unwrap();
        assert_eq!(body, json!({"resourceIds": ["srv-1", "dpg-2"]}));
    }

    #[test]
    fn test_update_input_serialization() {
        let input = UpdateEnvironmentInput {
            name: None,
            protected_status: Some(ProtectedStatus::Protected),
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"protectedStatus": "protected"})
        );
    }

    #[test]
    fn test_list_params_query() {
        assert!(ListEnvironmentsParams::default().to_query().is_empty());
        assert_eq!(
            ListEnvironmentsParams::default().project_id("prj-1").to_query(),
            vec![("projectId".to_string(), QueryValue::from("prj-1"))]
        );
    }
}
