//! Project resource implementation.
//!
//! Projects group the environments of an application under one owner
//! (a user or a team).
//!
//! # Example
//!
//! ```rust,ignore
//! use render_api::rest::resources::{CreateProjectInput, ListProjectsParams};
//! use render_api::pagination::PaginationParams;
//!
//! let page = client
//!     .projects()
//!     .list(&ListProjectsParams::default().owner_id("tea-123"), PaginationParams::default())
//!     .await?;
//! for project in page.iter() {
//!     println!("{} ({})", project.name, project.id);
//! }
//!
//! let project = client
//!     .projects()
//!     .create(&CreateProjectInput::new("storefront", "tea-123"))
//!     .await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{QueryValue, RenderError};
use crate::pagination::{
    fetch_one_page, paginate, AutoPaginateOptions, CursorItem, ItemStream, PaginatedResponse,
    PaginationParams,
};
use crate::rest::resource::{path_segment, Resource};
use crate::rest::resources::ProtectedStatus;

/// A Render project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// The unique identifier (e.g., `prj-abc123`).
    pub id: String,
    /// The project name.
    pub name: String,
    /// The owning user or team.
    pub owner_id: String,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}

/// List element of `GET /projects`.
#[derive(Debug, Clone, Deserialize)]
struct ProjectWithCursor {
    cursor: String,
    project: Project,
}

impl From<ProjectWithCursor> for CursorItem<Project> {
    fn from(wire: ProjectWithCursor) -> Self {
        Self::new(wire.cursor, wire.project)
    }
}

/// An environment to create together with a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEnvironmentInput {
    /// The environment name.
    pub name: String,
    /// Whether the environment is protected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_status: Option<ProtectedStatus>,
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    /// The project name.
    pub name: String,
    /// The owning user or team.
    pub owner_id: String,
    /// Environments to create with the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environments: Option<Vec<ProjectEnvironmentInput>>,
}

impl CreateProjectInput {
    /// Creates an input with no initial environments.
    #[must_use]
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner_id: owner_id.into(),
            environments: None,
        }
    }
}

/// Body of `PATCH /projects/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    /// The new project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Filters for listing projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListProjectsParams {
    /// Only projects with this name.
    pub name: Option<String>,
    /// Only projects owned by these owners.
    pub owner_ids: Vec<String>,
}

impl ListProjectsParams {
    /// Filters by project name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds an owner to filter by.
    #[must_use]
    pub fn owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_ids.push(owner_id.into());
        self
    }

    fn to_query(&self) -> Vec<(String, QueryValue)> {
        let mut query = Vec::new();
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            query.push(("name".to_string(), QueryValue::from(name)));
        }
        if !self.owner_ids.is_empty() {
            query.push(("ownerId".to_string(), self.owner_ids.join(",").into()));
        }
        query
    }
}

/// Client for the `/projects` endpoints.
#[derive(Clone, Debug)]
pub struct ProjectsResource {
    base: Resource,
}

impl ProjectsResource {
    /// Creates the resource over a shared transport.
    #[must_use]
    pub const fn new(base: Resource) -> Self {
        Self { base }
    }

    /// Fetches one page of projects.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or a `Validation` error if an element does
    /// not match [`Project`].
    pub async fn list(
        &self,
        params: &ListProjectsParams,
        page: PaginationParams,
    ) -> Result<PaginatedResponse<Project>, RenderError> {
        let fetch = self
            .base
            .page_fetcher::<ProjectWithCursor, Project>("/projects", params.to_query());
        fetch_one_page(fetch, page).await
    }

    /// Lazily yields every project matching `params`.
    #[must_use]
    pub fn list_all(
        &self,
        params: &ListProjectsParams,
        options: AutoPaginateOptions,
    ) -> ItemStream<'static, Project> {
        let fetch = self
            .base
            .page_fetcher::<ProjectWithCursor, Project>("/projects", params.to_query());
        paginate(fetch, options)
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns a transport or `Validation` error.
    pub async fn create(&self, input: &CreateProjectInput) -> Result<Project, RenderError> {
        let body = Resource::to_body(input)?;
        let response = self.base.http().post("/projects", Some(body)).await?;
        Resource::parse(response)
    }

    /// Retrieves a project by id.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error for an unknown id, or another transport or
    /// `Validation` error.
    pub async fn retrieve(&self, project_id: &str) -> Result<Project, RenderError> {
        let path = format!("/projects/{}", path_segment(project_id));
        let response = self.base.http().get(&path, &[]).await?;
        Resource::parse(response)
    }

    /// Updates a project.
    ///
    /// # Errors
    ///
    /// Returns a transport or `Validation` error.
    pub async fn update(
        &self,
        project_id: &str,
        input: &UpdateProjectInput,
    ) -> Result<Project, RenderError> {
        let path = format!("/projects/{}", path_segment(project_id));
        let body = Resource::to_body(input)?;
        let response = self.base.http().patch(&path, Some(body)).await?;
        Resource::parse(response)
    }

    /// Deletes a project.
    ///
    /// # Errors
    ///
    /// Returns a transport error.
    pub async fn delete(&self, project_id: &str) -> Result<(), RenderError> {
        let path = format!("/projects/{}", path_segment(project_id));
        self.base.http().delete(&path).await?;
        Ok(())
    }
}
