//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! resolution, metadata lookup and dispatch to listing or file content.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::header::{HeaderName, CONTENT_LENGTH, RANGE, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use tokio::fs;

use super::error::ServeError;
use super::{content, listing, resolve};
use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub range_header: Option<&'a str>,
}

/// Main entry point for HTTP request handling.
///
/// Never fails: every error becomes a response, so one bad request cannot
/// take down the connection or its neighbours.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let method = req.method();

    let response = match *method {
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                path: req.uri().path(),
                is_head: *method == Method::HEAD,
                range_header: req.headers().get(RANGE).and_then(|v| v.to_str().ok()),
            };
            serve(&ctx, &state)
                .await
                .unwrap_or_else(|err| err.into_response(ctx.path))
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    };

    if state.logging.access_log {
        log_access(&req, &response, peer_addr, started, &state.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve, stat and dispatch a GET/HEAD request
async fn serve(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<ResponseBody>, ServeError> {
    let path = resolve::resolve_path(&state.root, ctx.path).await?;
    let metadata = fs::metadata(&path).await?;

    logger::log_debug(&format!("{} -> {}", ctx.path, path.display()));

    if metadata.is_dir() {
        let entries = listing::read_entries(&path).await?;
        let html = listing::render_listing(ctx.path, &entries);
        Ok(http::response::build_html_response(html, ctx.is_head))
    } else {
        content::serve_file(&path, metadata.len(), ctx.range_header, ctx.is_head).await
    }
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
    format: &str,
) {
    logger::log_access(&access_entry(req, response, peer_addr, started), format);
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = logger::http_version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    // HEAD declares a length but sends nothing
    entry.body_bytes = if req.method() == Method::HEAD {
        0
    } else {
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}
