//! HTTP-level tests against a mock TMDb server.

use mockito::{Matcher, Server};
use tmdb_client::{CachedFetcher, MetadataFetcher, TmdbClient, TmdbConfig, TmdbError};

const AVATAR: &str = r#"{
    "id": 19995,
    "imdb_id": "tt0499549",
    "poster_path": "/kyeqWdyUXW608qlYkRqosgbbJyK.jpg",
    "release_date": "2009-12-15",
    "genres": [
        {"id": 28, "name": "Action"},
        {"id": 12, "name": "Adventure"},
        {"id": 14, "name": "Fantasy"},
        {"id": 878, "name": "Science Fiction"}
    ]
}"#;

fn client_for(server: &Server) -> TmdbClient {
    TmdbClient::new(TmdbConfig::new("test-key").with_api_base_url(server.url()))
}

#[tokio::test]
async fn test_fetch_details_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/movie/19995")
        .match_query(Matcher::UrlEncoded("api_key".into(), "test-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(AVATAR)
        .create_async()
        .await;

    let details = client_for(&server).fetch_details(19995).await.unwrap();

    assert_eq!(
        details.poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/kyeqWdyUXW608qlYkRqosgbbJyK.jpg")
    );
    assert_eq!(details.imdb_id.as_deref(), Some("tt0499549"));
    assert_eq!(details.release_year.as_deref(), Some("2009"));
    assert_eq!(
        details.genres,
        vec!["Action", "Adventure", "Fantasy", "Science Fiction"]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_details_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"success":false,"status_code":34,"status_message":"The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let result = client_for(&server).fetch_details(1).await;

    match result {
        Err(TmdbError::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "The resource you requested could not be found.");
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_details_invalid_json() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("invalid json")
        .create_async()
        .await;

    let result = client_for(&server).fetch_details(2).await;
    assert!(matches!(result, Err(TmdbError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_gateway_error_page_is_truncated() {
    let mut server = Server::new_async().await;
    let page = format!(
        "<html><head><title>502 Bad Gateway</title></head><body>{}</body></html>",
        "<p>upstream unavailable</p>\n".repeat(100)
    );
    let _mock = server
        .mock("GET", "/movie/3")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body(page)
        .create_async()
        .await;

    match client_for(&server).fetch_details(3).await {
        Err(TmdbError::Status { status, message }) => {
            assert_eq!(status, 502);
            assert!(message.starts_with("<html><head><title>502 Bad Gateway</title>"));
            assert!(message.ends_with("..."));
            assert!(message.len() < 300);
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_image_base_url_is_configurable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/19995")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(AVATAR)
        .create_async()
        .await;

    let client = TmdbClient::new(
        TmdbConfig::new("test-key")
            .with_api_base_url(server.url())
            .with_image_base_url("https://image.tmdb.org/t/p/original"),
    );
    let details = client.fetch_details(19995).await.unwrap();

    assert_eq!(
        details.poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/original/kyeqWdyUXW608qlYkRqosgbbJyK.jpg")
    );
}

#[tokio::test]
async fn test_transport_error_hides_api_key() {
    // Nothing listens on port 9 of the loopback interface
    let client = TmdbClient::new(
        TmdbConfig::new("very-secret-key").with_api_base_url("http://127.0.0.1:9/3"),
    );

    let error = client.fetch_details(3).await.unwrap_err();
    assert!(matches!(error, TmdbError::Http(_)));
    assert!(!error.to_string().contains("very-secret-key"));
}

#[tokio::test]
async fn test_cached_fetcher_hits_api_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/movie/19995")
        .match_query(Matcher::UrlEncoded("api_key".into(), "test-key".into()))
        .with_status(200)
        .with_body(AVATAR)
        .expect(1)
        .create_async()
        .await;

    let fetcher = CachedFetcher::new(client_for(&server), 10);
    let first = fetcher.fetch_details(19995).await.unwrap();
    let second = fetcher.fetch_details(19995).await.unwrap();

    assert!(first.is_some());
    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cached_fetcher_remembers_failures() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/movie/500")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(1)
        .create_async()
        .await;

    let fetcher = CachedFetcher::new(client_for(&server), 10);

    assert!(fetcher.fetch_details(500).await.is_err());
    assert_eq!(fetcher.fetch_details(500).await.unwrap(), None);
    mock.assert_async().await;
}
