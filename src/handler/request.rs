//! Request entry point
//!
//! Validates the method, delegates to static file serving, then appends the
//! cache headers and writes the access log line.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::header::{HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, SERVER};
use hyper::{Method, Request, Response, Uri, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let target = request_target(req.uri());

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        target.to_string(),
    );
    entry.http_version = version_label(req.version()).to_string();

    let mut response = respond(&req, &state).await;

    response
        .headers_mut()
        .insert(SERVER, HeaderValue::from_static(SERVER_NAME));
    http::decorate_response(state.decorator.as_ref(), target, &mut response);

    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact();
    logger::log_access(&entry);

    Ok(response)
}

/// Build the undecorated response
async fn respond<B>(req: &Request<B>, state: &AppState) -> Response<ResponseBody> {
    let method = req.method();
    if let Some(resp) = check_http_method(method) {
        return resp;
    }

    let ctx = RequestContext {
        path: req.uri().path(),
        query: req.uri().query(),
        is_head: *method == Method::HEAD,
        if_modified_since: header_string(req, &IF_MODIFIED_SINCE),
        if_none_match: header_string(req, &IF_NONE_MATCH),
    };

    static_files::serve(&ctx, &state.config.root).await
}

/// Only GET and HEAD are served
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            Some(http::build_501_response(method.as_str()))
        }
    }
}

/// The request-target as hyper parsed it: path plus query.
///
/// hyper's URI parser discards a `#fragment` before the request reaches the
/// service, so `/app.js#top` arrives here as `/app.js`.
fn request_target(uri: &Uri) -> &str {
    uri.path_and_query().map_or("/", |pq| pq.as_str())
}

fn header_string<B>(req: &Request<B>, name: &HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
