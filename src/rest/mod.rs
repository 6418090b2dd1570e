//! Resource layer for the Render REST API.
//!
//! Resources build request descriptors, send them through the shared
//! [`HttpClient`](crate::clients::HttpClient) (or the
//! [`pagination`](crate::pagination) engine for list endpoints) and convert
//! payloads into typed models.
//!
//! # Example
//!
//! ```rust,ignore
//! use render_api::RenderClient;
//! use render_api::pagination::{AutoPaginateOptions, PaginationParams};
//! use render_api::rest::resources::{ListProjectsParams, UpdateProjectInput};
//!
//! let client = RenderClient::from_env()?;
//!
//! // One page
//! let page = client
//!     .projects()
//!     .list(&ListProjectsParams::default(), PaginationParams::default().limit(50))
//!     .await?;
//! println!("{} projects, more: {}", page.len(), page.has_more);
//!
//! // Every page, collected
//! let all = render_api::pagination::collect_all(
//!     client.projects().list_all(&ListProjectsParams::default(), AutoPaginateOptions::default()),
//! )
//! .await?;
//!
//! // Single-item operations
//! let project = client.projects().retrieve("prj-123").await?;
//! let renamed = client
//!     .projects()
//!     .update(&project.id, &UpdateProjectInput { name: Some("shop".into()) })
//!     .await?;
//! ```

mod resource;
pub mod resources;

pub use resource::{path_segment, PageFetcher, Resource};
