//! Integration tests for cursor pagination over a mock Render API.

use std::time::Duration;

use futures::StreamExt;
use render_api::pagination::collect_all;
use render_api::rest::resources::ListProjectsParams;
use render_api::{
    ApiKey, AutoPaginateOptions, BaseUrl, ErrorKind, PaginationParams, RenderClient, RenderConfig,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, max_retries: u32) -> RenderClient {
    let config = RenderConfig::builder()
        .api_key(ApiKey::new("rnd_test_key").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .max_retries(max_retries)
        .initial_retry_delay(Duration::from_millis(10))
        .build()
        .unwrap();
    RenderClient::new(config).unwrap()
}

/// A page of projects `prj-{from}..prj-{to}` with cursors `c{n}`.
fn projects_page(from: u32, to: u32) -> Value {
    let items: Vec<Value> = (from..to)
        .map(|n| {
            json!({
                "cursor": format!("c{n}"),
                "project": {
                    "id": format!("prj-{n}"),
                    "name": format!("project {n}"),
                    "ownerId": "tea-1",
                    "createdAt": "2024-01-15T10:30:00Z",
                    "updatedAt": "2024-01-15T10:30:00Z"
                }
            })
        })
        .collect();
    Value::Array(items)
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

/// Mounts three pages of two projects each, then an empty page.
///
/// Cursor-specific mocks go first so they take precedence over the
/// first-page mock.
async fn mount_three_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_page(2, 4)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("cursor", "c3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_page(4, 6)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("cursor", "c5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_page(0, 2)))
        .mount(server)
        .await;
}

fn two_per_page() -> AutoPaginateOptions {
    AutoPaginateOptions::default().limit(2)
}

// ============================================================================
// Auto-pagination
// ============================================================================

#[tokio::test]
async fn test_list_all_walks_every_page_until_empty() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client_for(&server, 0);
    let stream = client
        .projects()
        .list_all(&ListProjectsParams::default(), two_per_page());
    let projects = collect_all(stream).await.unwrap();

    let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["prj-0", "prj-1", "prj-2", "prj-3", "prj-4", "prj-5"]
    );
    // three pages plus the empty one
    assert_eq!(request_count(&server).await, 4);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("limit=2"));
    assert_eq!(requests[1].url.query(), Some("cursor=c1&limit=2"));
}

#[tokio::test]
async fn test_list_all_max_items_skips_unneeded_pages() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client_for(&server, 0);
    let stream = client
        .projects()
        .list_all(&ListProjectsParams::default(), two_per_page().max_items(3));
    let projects = collect_all(stream).await.unwrap();

    assert_eq!(projects.len(), 3);
    assert_eq!(projects[2].id, "prj-2");
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_list_all_resumes_from_cursor() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client_for(&server, 0);
    let stream = client.projects().list_all(
        &ListProjectsParams::default(),
        two_per_page().cursor("c3"),
    );
    let projects = collect_all(stream).await.unwrap();

    let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["prj-4", "prj-5"]);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_list_all_is_lazy() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client_for(&server, 0);
    let mut stream = client
        .projects()
        .list_all(&ListProjectsParams::default(), two_per_page());
    assert_eq!(request_count(&server).await, 0);

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.id, "prj-0");
    stream.next().await.unwrap().unwrap();
    assert_eq!(request_count(&server).await, 1);

    drop(stream);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_list_all_sends_filters_on_every_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("cursor", "c1"))
        .and(query_param("ownerId", "usr-1,tea-1"))
        .and(query_param("name", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("ownerId", "usr-1,tea-1"))
        .and(query_param("name", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_page(0, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let params = ListProjectsParams::default()
        .name("web")
        .owner_id("usr-1")
        .owner_id("tea-1");
    let client = client_for(&server, 0);
    let projects = collect_all(client.projects().list_all(&params, two_per_page()))
        .await
        .unwrap();

    assert_eq!(projects.len(), 2);
}

#[tokio::test]
async fn test_list_all_yields_error_once_and_stops() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("cursor", "c1"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_page(0, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 2);
    let results: Vec<_> = client
        .projects()
        .list_all(&ListProjectsParams::default(), two_per_page())
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    let error = results[2].as_ref().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Forbidden);
    assert_eq!(error.message(), "Forbidden");
}

#[tokio::test]
async fn test_list_all_retries_transient_page_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_page(0, 2)))
        .mount(&server)
        .await;

    let client = client_for(&server, 2);
    let projects = collect_all(
        client
            .projects()
            .list_all(&ListProjectsParams::default(), two_per_page()),
    )
    .await
    .unwrap();

    assert_eq!(projects.len(), 2);
    // 503, first page, empty page
    assert_eq!(request_count(&server).await, 3);
}

// ============================================================================
// Single pages
// ============================================================================

#[tokio::test]
async fn test_list_pages_manually_with_next_page_params() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client_for(&server, 0);
    let params = ListProjectsParams::default();

    let first = client
        .projects()
        .list(&params, PaginationParams::default().limit(2))
        .await
        .unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.has_more);
    assert_eq!(first.cursor.as_deref(), Some("c1"));

    let next = first.next_page_params(Some(2)).unwrap();
    let second = client.projects().list(&params, next).await.unwrap();
    assert_eq!(second[0].id, "prj-2");
}

#[tokio::test]
async fn test_list_short_page_has_no_more() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_page(0, 1)))
        .mount(&server)
        .await;

    let page = client_for(&server, 0)
        .projects()
        .list(
            &ListProjectsParams::default(),
            PaginationParams::default().limit(5),
        )
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert!(!page.has_more);
    assert_eq!(page.cursor.as_deref(), Some("c0"));
}

#[tokio::test]
async fn test_list_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let page = client_for(&server, 0)
        .projects()
        .list(&ListProjectsParams::default(), PaginationParams::default())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert!(page.cursor.is_none());
    assert!(!page.has_more);
}
