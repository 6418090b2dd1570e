//! # Render API Rust Client
//!
//! A typed async Rust client for the [Render](https://render.com) REST API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`RenderConfig`] and [`RenderConfigBuilder`]
//! - An async HTTP transport with per-attempt timeouts, retries with
//!   exponential backoff, and typed errors ([`RenderError`], [`ErrorKind`])
//! - Cursor-based pagination, one page at a time or as a lazy stream
//! - Typed resources for users, projects, environments and events
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use render_api::{ApiKey, RenderConfig};
//!
//! let config = RenderConfig::builder()
//!     .api_key(ApiKey::new("rnd_abc123").unwrap())
//!     .timeout(Duration::from_secs(10))
//!     .max_retries(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_retries(), 2);
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use render_api::{ErrorKind, RenderClient};
//! use render_api::pagination::AutoPaginateOptions;
//! use render_api::rest::resources::ListProjectsParams;
//!
//! let client = RenderClient::from_env()?;
//!
//! let me = client.users().me().await?;
//! println!("Hello, {}", me.email);
//!
//! let mut projects = client
//!     .projects()
//!     .list_all(&ListProjectsParams::default(), AutoPaginateOptions::default());
//! while let Some(project) = projects.next().await {
//!     println!("- {}", project?.name);
//! }
//!
//! match client.projects().retrieve("prj-missing").await {
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("not found ({:?})", e.request_id()),
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: every attempt and response status at
//! `debug`, every retry at `warn`. Install any `tracing` subscriber to see
//! them; nothing is printed otherwise.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All client types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod pagination;
pub mod rest;

pub use client::RenderClient;
pub use config::{ApiKey, BaseUrl, RenderConfig, RenderConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiErrorBody, ErrorKind, HttpClient, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, QueryValue, RenderError,
};

// Re-export pagination types
pub use pagination::{
    AutoPaginateOptions, CursorItem, PaginatedResponse, PaginationParams, DEFAULT_PAGE_SIZE,
};
