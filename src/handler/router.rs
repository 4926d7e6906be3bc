//! Request routing module
//!
//! Entry point for HTTP request processing: method gating, context
//! extraction, static file dispatch, and the response exit point where the
//! security header set and the access log are applied.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Request context for static file serving
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Every response leaves through the bottom of this function, which is
/// what guarantees the security header set is attached regardless of
/// status, and that every request gets exactly one access log line.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 1. Method gate: the server is read-only
    let mut response = match *req.method() {
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                path: req.uri().path(),
                is_head: *req.method() == Method::HEAD,
                if_none_match: header_string(&req, "if-none-match"),
                range: header_string(&req, "range"),
            };
            // 2. Static file dispatch
            static_files::serve(&ctx, &state).await
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {}", req.method()));
            http::method_not_allowed()
        }
    };

    // 3. Fixed security header set, attached to every response
    state.security_headers.apply(response.headers_mut());

    // 4. Access log
    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Extract a request header as an owned string
fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Build the access log entry for a finished request/response pair
fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_str(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}
