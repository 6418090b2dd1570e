//! Shared plumbing for Render resources.
//!
//! Every resource wraps a [`Resource`], which holds the shared transport and
//! converts raw JSON payloads into typed models. Conversion failures become
//! [`Validation`](crate::ErrorKind::Validation) errors.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse, QueryValue, RenderError};
use crate::pagination::CursorItem;

/// A page fetcher as accepted by [`paginate`](crate::pagination::paginate).
pub type PageFetcher<T> = Box<
    dyn FnMut(Option<String>, Option<u32>) -> BoxFuture<'static, Result<Vec<CursorItem<T>>, RenderError>>
        + Send,
>;

/// Base for resource clients: the shared transport plus payload validation.
#[derive(Clone, Debug)]
pub struct Resource {
    http: Arc<HttpClient>,
}

impl Resource {
    /// Creates a resource base over the shared transport.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Returns the shared transport.
    #[must_use]
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// Converts a response payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the payload does not match `T`.
    pub fn validate<T: DeserializeOwned>(data: Option<Value>) -> Result<T, RenderError> {
        serde_json::from_value(data.unwrap_or(Value::Null)).map_err(|e| {
            RenderError::validation(
                format!("Response validation failed: {e}"),
                Some(Box::new(e)),
            )
        })
    }

    /// Converts a JSON array payload into a `Vec<T>`, reporting the index of
    /// the first element that does not match.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the payload is not an array or an
    /// element does not match `T`.
    pub fn validate_items<T: DeserializeOwned>(data: Option<Value>) -> Result<Vec<T>, RenderError> {
        let Some(Value::Array(values)) = data else {
            return Err(RenderError::validation(
                "Response validation failed: expected an array",
                None,
            ));
        };

        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value).map_err(|e| {
                    RenderError::validation(
                        format!("Response validation failed at index {index}: {e}"),
                        Some(Box::new(e)),
                    )
                })
            })
            .collect()
    }

    /// Converts a response envelope into `T`, keeping its request id on
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the payload does not match `T`.
    pub fn parse<T: DeserializeOwned>(response: HttpResponse) -> Result<T, RenderError> {
        let request_id = response.request_id().map(String::from);
        Self::validate(response.data).map_err(|e| e.with_request_id(request_id))
    }

    /// Serializes a request input into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` error if `input` cannot be represented as
    /// JSON.
    pub fn to_body<I: Serialize>(input: &I) -> Result<Value, RenderError> {
        serde_json::to_value(input).map_err(|e| {
            RenderError::invalid_request(format!("Failed to serialize request body: {e}"))
        })
    }

    /// Builds a page fetcher for a list endpoint.
    ///
    /// `filters` are sent with every page; the fetcher adds `cursor` and
    /// `limit`. Each element of the response is parsed as the wire wrapper
    /// `W` and converted into a [`CursorItem`].
    pub fn page_fetcher<W, T>(
        &self,
        path: &'static str,
        filters: Vec<(String, QueryValue)>,
    ) -> PageFetcher<T>
    where
        W: DeserializeOwned + Into<CursorItem<T>> + Send + 'static,
        T: Send + 'static,
    {
        let http = Arc::clone(&self.http);
        Box::new(move |cursor, limit| {
            let request = filters
                .iter()
                .fold(HttpRequest::builder(HttpMethod::Get, path), |builder, (k, v)| {
                    builder.query_param(k.clone(), v.clone())
                })
                .query_param_opt("cursor", cursor)
                .query_param_opt("limit", limit)
                .build();
            let http = Arc::clone(&http);
            async move {
                let response = http.execute(request).await?;
                let request_id = response.request_id().map(String::from);
                let wrapped: Vec<W> = Self::validate_items(response.data)
                    .map_err(|e| e.with_request_id(request_id))?;
                Ok(wrapped.into_iter().map(Into::into).collect())
            }
            .boxed()
        })
    }
}

/// Percent-encodes a single path segment (e.g., a resource id).
#[must_use]
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ErrorKind;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_validate_typed_payload() {
        let named: Named = Resource::validate(Some(json!({"name": "web"}))).unwrap();
        assert_eq!(named.name, "web");
    }

    #[test]
    fn test_validate_mismatch_is_validation_error() {
        let error = Resource::validate::<Named>(Some(json!({"name": 1}))).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(error.message().starts_with("Response validation failed"));
    }

    #[test]
    fn test_validate_missing_payload() {
        let error = Resource::validate::<Named>(None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        Resource::validate::<()>(None).unwrap();
    }

    #[test]
    fn test_validate_items_reports_index() {
        let data = json!([{"name": "a"}, {"name": "b"}, {"nope": true}]);
        let error = Resource::validate_items::<Named>(Some(data)).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(error.message().contains("at index 2"), "{}", error.message());
    }

    #[test]
    fn test_validate_items_requires_array() {
        let error = Resource::validate_items::<Named>(Some(json!({"name": "a"}))).unwrap_err();
        assert!(error.message().contains("expected an array"));
    }

    #[test]
    fn test_parse_keeps_request_id() {
        let mut headers = std::collections::HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["req_7".to_string()]);
        let response = HttpResponse::new(200, headers, Some(json!([])));

        let error = Resource::parse::<Named>(response).unwrap_err();
        assert_eq!(error.request_id(), Some("req_7"));
    }

    #[test]
    fn test_path_segment_encoding() {
        assert_eq!(path_segment("prj-abc123"), "prj-abc123");
        assert_eq!(path_segment("a/b c"), "a%2Fb%20c");
    }
}
