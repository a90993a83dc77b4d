//! Integration tests for the dev proxy: byte-for-byte passthrough with a
//! live upstream, and the 502 diagnostic when nothing is listening.

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use webshim_assets::{DevProxy, DevServerConfig};

/// Reserve a loopback port with no listener on it.
async fn dead_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

/// Start a real upstream server; returns its port.
async fn spawn_upstream(app: Router) -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    port
}

fn proxy_router(port: u16) -> Router {
    let config = DevServerConfig::new().with_upstream_port(port);
    DevProxy::new(&config).into_router()
}

async fn read_body(resp: axum::response::Response) -> (StatusCode, HeaderMap, Bytes) {
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), 1 << 20)
        .await
        .expect("read body");
    (status, headers, bytes)
}

#[tokio::test]
async fn dead_upstream_yields_fixed_bad_gateway_diagnostic() {
    let router = proxy_router(dead_port().await);

    for (method, path) in [
        (Method::GET, "/"),
        (Method::GET, "/assets/app.js"),
        (Method::POST, "/api/data"),
        (Method::DELETE, "/anything?x=1"),
    ] {
        let req = Request::builder()
            .method(method.clone())
            .uri(path)
            .body(Body::empty())
            .expect("build request");
        let resp = router.clone().oneshot(req).await.expect("proxy handler");
        let (status, headers, body) = read_body(resp).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY, "{method} {path} must be 502");
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(
            content_type.starts_with("text/plain"),
            "diagnostic must be plain text, got {content_type}"
        );
        let text = String::from_utf8_lossy(&body).into_owned();
        assert!(
            text.contains("The web client development server isn't running."),
            "remediation text missing for {method} {path}: {text}"
        );
        assert!(
            text.contains("tool/yarn"),
            "diagnostic must name the start command: {text}"
        );
        assert!(
            text.contains("\n\nError: "),
            "diagnostic must append the underlying error: {text}"
        );
    }
}

#[tokio::test]
async fn live_upstream_get_is_relayed_byte_for_byte() {
    let upstream = Router::new().route(
        "/foo",
        get(|| async {
            (
                StatusCode::OK,
                [("x-upstream", "yes")],
                "upstream says hi",
            )
        }),
    );
    let port = spawn_upstream(upstream).await;
    let router = proxy_router(port);

    let req = Request::builder()
        .uri("/foo")
        .body(Body::empty())
        .expect("build request");
    let resp = router.oneshot(req).await.expect("proxy handler");
    let (status, headers, body) = read_body(resp).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get("x-upstream").and_then(|v| v.to_str().ok()),
        Some("yes"),
        "upstream response headers must be relayed"
    );
    assert_eq!(body.as_ref(), b"upstream says hi", "body must be byte-identical");
}

#[tokio::test]
async fn live_upstream_sees_method_headers_and_body_unchanged() {
    // Echo back everything the upstream observed.
    async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
        let token = headers
            .get("x-forwarded-token")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("missing")
            .to_owned();
        let summary = format!("{method} {uri} token={token} body={}", String::from_utf8_lossy(&body));
        (StatusCode::CREATED, summary)
    }
    let upstream = Router::new().fallback(echo);
    let port = spawn_upstream(upstream).await;
    let router = proxy_router(port);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/items?kind=widget")
        .header("x-forwarded-token", "t-123")
        .body(Body::from("hello upstream"))
        .expect("build request");
    let resp = router.oneshot(req).await.expect("proxy handler");
    let (status, _, body) = read_body(resp).await;

    assert_eq!(status, StatusCode::CREATED, "upstream status must be relayed");
    let text = String::from_utf8_lossy(&body).into_owned();
    assert!(text.starts_with("POST "), "method must be forwarded: {text}");
    assert!(
        text.contains("/api/items?kind=widget"),
        "path and query must be forwarded: {text}"
    );
    assert!(text.contains("token=t-123"), "headers must be forwarded: {text}");
    assert!(text.contains("body=hello upstream"), "body must be forwarded: {text}");
}

#[tokio::test]
async fn upstream_error_recovers_per_request_without_crashing() {
    // First request against a dead port, then the same router keeps
    // serving 502s rather than wedging.
    let router = proxy_router(dead_port().await);
    for _ in 0..3 {
        let req = Request::builder()
            .uri("/retry")
            .body(Body::empty())
            .expect("build request");
        let resp = router.clone().oneshot(req).await.expect("proxy handler");
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
