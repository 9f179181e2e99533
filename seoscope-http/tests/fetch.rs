use seoscope_http::{FetchError, HttpClient, PageFetcher, StatusCode, parse_http_url};
use std::time::Duration;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = "<html><head><title>Hello</title></head><body></body></html>";

#[tokio::test]
async fn returns_body_and_content_type_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let page = client
        .fetch_page(&format!("{}/landing", server.uri()))
        .await
        .expect("page fetched");

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body, PAGE);
    assert_eq!(
        page.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
    assert!(page.looks_like_html());
}

#[tokio::test]
async fn not_found_is_classified_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .fetch_page(&format!("{}/missing", server.uri()))
        .await
        .expect_err("404 must fail");

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(matches!(err, FetchError::Http { .. }));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client.fetch_page(&server.uri()).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    // `expect(1)` is verified when the server drops.
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = HttpClient::new().unwrap();
    let err = client
        .fetch_page(&format!("http://127.0.0.1:{port}/"))
        .await
        .expect_err("nothing is listening");

    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn slow_response_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new()
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let err = client.fetch_page(&server.uri()).await.unwrap_err();

    match err {
        FetchError::Transport { cause } => assert!(cause.contains("timed out")),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn follows_redirects_and_reports_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html"))
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let url = parse_http_url(&format!("{}/old", server.uri())).unwrap();
    let page = client.fetch(&url).await.expect("redirect followed");

    assert_eq!(page.url.path(), "/new");
    assert_eq!(page.body, PAGE);
}

#[tokio::test]
async fn error_status_wins_over_a_stalled_body() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = sock.read(&mut buf).await;
        sock.write_all(
            b"HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: 1000\r\n\r\npartial",
        )
        .await
        .unwrap();
        // Promise 1000 bytes, deliver 7, then hang.
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let client = HttpClient::new()
        .unwrap()
        .with_timeout(Duration::from_millis(500));
    let err = client
        .fetch_page(&format!("http://{addr}/gone"))
        .await
        .expect_err("404 must fail");

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(!err.is_transport());
    server.abort();
}
