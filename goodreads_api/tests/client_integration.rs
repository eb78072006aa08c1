use goodreads_api::{Client, Error};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_html_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genres/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>genres</html>"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let url = format!("{}/genres/list", mock_server.uri());
    let body = client.get_html(&url).await.unwrap();
    assert_eq!(body, "<html>genres</html>");
}

#[tokio::test]
async fn get_html_passes_query_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genres/list"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("page two"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let url = client.resolve("/genres/list?page=2").unwrap();
    assert_eq!(client.get_html(&url).await.unwrap(), "page two");
}

#[tokio::test]
async fn get_html_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genres/list"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let url = format!("{}/genres/list", mock_server.uri());
    match client.get_html(&url).await {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn get_html_not_found() {
    let mock_server = MockServer::start().await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let url = format!("{}/book/show/missing", mock_server.uri());
    let result = client.get_html(&url).await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 404, .. })));
}

#[tokio::test]
async fn get_html_connection_refused() {
    // Port 9 (discard) is not expected to be listening on test hosts.
    let client = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let result = client.get_html("http://127.0.0.1:9/genres/list").await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}
