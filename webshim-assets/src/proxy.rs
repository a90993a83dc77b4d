//! Reverse proxy to the JavaScript dev server.
//!
//! Forwards every request to the dev server's loopback address unchanged
//! and relays the response unchanged. The only custom branch is the
//! upstream-unreachable path, which answers 502 with remediation
//! instructions so an operator always sees how to start the dev server.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::DevServerConfig;

/// Reverse-proxy handler targeting the dev server's fixed loopback port.
#[derive(Debug, Clone)]
pub struct DevProxy {
    client: Client<HttpConnector, Body>,
    authority: String,
    start_hint: String,
}

impl DevProxy {
    /// Create a proxy pointed at `127.0.0.1:<upstream_port>`.
    #[must_use]
    pub fn new(config: &DevServerConfig) -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            authority: format!("127.0.0.1:{}", config.upstream_port),
            start_hint: config.start_hint(),
        }
    }

    /// Build a router that forwards every path and method upstream.
    #[must_use]
    pub fn into_router(self) -> Router {
        Router::new().fallback(forward).with_state(self)
    }

    fn bad_gateway(&self, err: &str) -> Response {
        let body = format!(
            "The web client development server isn't running. {}\n\nError: {err}",
            self.start_hint
        );
        (StatusCode::BAD_GATEWAY, body).into_response()
    }
}

async fn forward(State(proxy): State<DevProxy>, mut req: Request) -> Response {
    let uri = match upstream_uri(&proxy.authority, req.uri()) {
        Ok(uri) => uri,
        Err(e) => return proxy.bad_gateway(&e.to_string()),
    };
    *req.uri_mut() = uri;

    match proxy.client.request(req).await {
        // Relay status, headers, and body untouched.
        Ok(resp) => resp.map(|body: hyper::body::Incoming| Body::new(body)),
        Err(e) => proxy.bad_gateway(&error_chain(&e)),
    }
}

/// Rewrite a request URI to target the upstream authority, preserving the
/// original path and query.
pub(crate) fn upstream_uri(authority: &str, original: &Uri) -> Result<Uri, axum::http::Error> {
    let path_and_query = original
        .path_and_query()
        .map_or("/", axum::http::uri::PathAndQuery::as_str);
    Uri::builder()
        .scheme("http")
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
}

/// Flatten an error and its sources into one line for the 502 body.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}
