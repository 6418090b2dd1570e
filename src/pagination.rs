//! Cursor-based pagination for Render list endpoints.
//!
//! Render list endpoints return an array of cursor-wrapped items; the cursor of
//! the last item fetches the next page. This module turns those pages into
//! either a single [`PaginatedResponse`] or a lazy [`Stream`] of every item.
//!
//! # Page fetchers
//!
//! Both [`fetch_one_page`] and [`paginate`] take a page fetcher: a closure
//! called with `(cursor, limit)` that returns one page of [`CursorItem`]s.
//! Endpoint filters are captured by the closure.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use render_api::pagination::AutoPaginateOptions;
//!
//! let mut projects = client
//!     .projects()
//!     .list_all(None, AutoPaginateOptions::default().max_items(100));
//!
//! while let Some(project) = projects.next().await {
//!     println!("{}", project?.name);
//! }
//! ```

use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use futures::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::clients::RenderError;

/// Page size assumed when a request does not set a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A boxed stream of items produced by [`paginate`].
pub type ItemStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T, RenderError>> + Send + 'a>>;

/// An item of a list response together with its pagination cursor.
///
/// The cursor is opaque and only meaningful for the endpoint and filters that
/// produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorItem<T> {
    /// Opaque cursor pointing after this item.
    pub cursor: String,
    /// The item payload.
    pub item: T,
}

impl<T> CursorItem<T> {
    /// Creates a cursor-wrapped item.
    #[must_use]
    pub fn new(cursor: impl Into<String>, item: T) -> Self {
        Self {
            cursor: cursor.into(),
            item,
        }
    }
}

/// One page of a list response.
///
/// Dereferences to the page's items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginatedResponse<T> {
    /// The items of this page, in server order.
    pub items: Vec<T>,
    /// Cursor of the last item; pass it back to fetch the next page.
    pub cursor: Option<String>,
    /// `true` if the page was full and a cursor exists.
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the parameters that fetch the next page, if there is one.
    #[must_use]
    pub fn next_page_params(&self, limit: Option<u32>) -> Option<PaginationParams> {
        if !self.has_more {
            return None;
        }
        self.cursor.as_ref().map(|cursor| PaginationParams {
            cursor: Some(cursor.clone()),
            limit,
        })
    }
}

impl<T> Deref for PaginatedResponse<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

/// Parameters for fetching a single page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationParams {
    /// Cursor returned by the previous page.
    pub cursor: Option<String>,
    /// Page size (the API accepts 1-100).
    pub limit: Option<u32>,
}

impl PaginationParams {
    /// Sets the cursor.
    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for traversing every page of a list endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutoPaginateOptions {
    /// Cursor to start from.
    pub cursor: Option<String>,
    /// Page size for every request.
    pub limit: Option<u32>,
    /// Maximum number of items to yield across all pages.
    pub max_items: Option<usize>,
}

impl AutoPaginateOptions {
    /// Sets the starting cursor.
    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Caps the number of items yielded.
    #[must_use]
    pub const fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }
}

/// Returns the page size used for `has_more` detection.
///
/// A missing or zero limit falls back to [`DEFAULT_PAGE_SIZE`].
#[must_use]
pub fn effective_limit(limit: Option<u32>) -> u32 {
    limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Returns the cursor of the last item, or `None` for an empty page.
#[must_use]
pub fn extract_cursor<T>(items: &[CursorItem<T>]) -> Option<&str> {
    items.last().map(|entry| entry.cursor.as_str())
}

/// Strips the cursors from a page.
#[must_use]
pub fn unwrap_items<T>(items: Vec<CursorItem<T>>) -> Vec<T> {
    items.into_iter().map(|entry| entry.item).collect()
}

/// Builds a [`PaginatedResponse`] from one page of cursor-wrapped items.
///
/// `has_more` is `true` when the page holds at least the effective limit and
/// its last item carries a cursor.
#[must_use]
pub fn create_paginated_response<T>(
    items: Vec<CursorItem<T>>,
    limit: Option<u32>,
) -> PaginatedResponse<T> {
    let cursor = extract_cursor(&items).map(String::from);
    let full_page = items.len() >= effective_limit(limit) as usize;
    let has_more = full_page && cursor.is_some();

    PaginatedResponse {
        items: unwrap_items(items),
        cursor,
        has_more,
    }
}

/// Fetches a single page and wraps it in a [`PaginatedResponse`].
///
/// # Errors
///
/// Returns the error of the page fetcher unchanged.
pub async fn fetch_one_page<T, F, Fut>(
    fetch_page: F,
    params: PaginationParams,
) -> Result<PaginatedResponse<T>, RenderError>
where
    F: FnOnce(Option<String>, Option<u32>) -> Fut,
    Fut: Future<Output = Result<Vec<CursorItem<T>>, RenderError>>,
{
    let cursor = params.cursor.filter(|c| !c.is_empty());
    let items = fetch_page(cursor, params.limit.filter(|l| *l > 0)).await?;
    Ok(create_paginated_response(items, params.limit))
}

struct PaginateState<F, T> {
    fetch_page: F,
    cursor: Option<String>,
    limit: Option<u32>,
    max_items: Option<usize>,
    buffer: std::vec::IntoIter<CursorItem<T>>,
    yielded: usize,
    fetched_once: bool,
    finished: bool,
}

impl<F, T> PaginateState<F, T> {
    fn reached_max(&self) -> bool {
        self.max_items.is_some_and(|max| self.yielded >= max)
    }
}

/// Lazily yields every item of a list endpoint, fetching pages on demand.
///
/// Traversal rules:
/// - The first request uses `options.cursor`; later requests use the cursor
///   of the previous page's last item.
/// - An empty page, or a last item without a cursor, ends the stream.
/// - With `max_items` set, the stream ends once that many items were
///   yielded, without fetching further pages. The first page is always
///   fetched, even for `max_items = 0`.
/// - A fetch error is yielded once and ends the stream.
///
/// At most one page is buffered. Dropping the stream cancels the traversal.
pub fn paginate<'a, T, F, Fut>(fetch_page: F, options: AutoPaginateOptions) -> ItemStream<'a, T>
where
    T: Send + 'a,
    F: FnMut(Option<String>, Option<u32>) -> Fut + Send + 'a,
    Fut: Future<Output = Result<Vec<CursorItem<T>>, RenderError>> + Send + 'a,
{
    let state = PaginateState {
        fetch_page,
        cursor: options.cursor,
        limit: options.limit.filter(|l| *l > 0),
        max_items: options.max_items,
        buffer: Vec::new().into_iter(),
        yielded: 0,
        fetched_once: false,
        finished: false,
    };

    Box::pin(futures::stream::unfold(state, |mut state| async move {
        loop {
            if state.finished {
                return None;
            }

            if let Some(entry) = state.buffer.next() {
                if state.reached_max() {
                    state.finished = true;
                    return None;
                }
                state.yielded += 1;
                if state.reached_max() {
                    state.finished = true;
                }
                return Some((Ok(entry.item), state));
            }

            let cursor = state.cursor.take().filter(|c| !c.is_empty());
            if state.fetched_once && cursor.is_none() {
                state.finished = true;
                return None;
            }

            tracing::debug!(cursor = ?cursor, limit = ?state.limit, "Fetching page");
            let items = match (state.fetch_page)(cursor, state.limit).await {
                Ok(items) => items,
                Err(error) => {
                    state.finished = true;
                    return Some((Err(error), state));
                }
            };
            state.fetched_once = true;

            if items.is_empty() {
                state.finished = true;
                return None;
            }

            state.cursor = extract_cursor(&items).map(String::from);
            state.buffer = items.into_iter();
        }
    }))
}

/// Drains a stream of items into a `Vec`.
///
/// # Errors
///
/// Returns the first error yielded by the stream.
pub async fn collect_all<T, S>(stream: S) -> Result<Vec<T>, RenderError>
where
    S: Stream<Item = Result<T, RenderError>>,
{
    stream.try_collect().await
}
