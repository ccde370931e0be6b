//! Response builders
//!
//! Every response the server emits is assembled here so header sets stay
//! consistent between handlers.

use hyper::header::{ACCEPT_RANGES, ALLOW, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

use super::body::{self, ResponseBody};
use super::range::ByteRange;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Short `text/plain` response with an exact Content-Length
pub fn build_text_response(status: StatusCode, message: &'static str) -> Response<ResponseBody> {
    finish(text(status, message), body::full(message), status)
}

/// 405 advertising the supported methods
pub fn build_405_response() -> Response<ResponseBody> {
    const MESSAGE: &str = "Method Not Allowed";
    let status = StatusCode::METHOD_NOT_ALLOWED;

    let builder = text(status, MESSAGE).header(ALLOW, "GET, HEAD");
    finish(builder, body::full(MESSAGE), status)
}

/// 416 carrying `Content-Range: bytes */<size>`
pub fn build_416_response(file_size: u64) -> Response<ResponseBody> {
    const MESSAGE: &str = "Range Not Satisfiable";
    let status = StatusCode::RANGE_NOT_SATISFIABLE;

    let builder = text(status, MESSAGE).header(CONTENT_RANGE, format!("bytes */{file_size}"));
    finish(builder, body::full(MESSAGE), status)
}

/// Directory listing page; HEAD keeps the length but drops the body
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, TEXT_HTML)
        .header(CONTENT_LENGTH, content.len());
    let body = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    finish(builder, body, StatusCode::INTERNAL_SERVER_ERROR)
}

/// 200 with the whole file
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    file_size: u64,
) -> Response<ResponseBody> {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, file_size)
        .header(ACCEPT_RANGES, "bytes");

    finish(builder, body, StatusCode::INTERNAL_SERVER_ERROR)
}

/// 206 with exactly `range` of a `file_size` byte file
pub fn build_partial_response(
    body: ResponseBody,
    content_type: &str,
    range: ByteRange,
    file_size: u64,
) -> Response<ResponseBody> {
    let ByteRange { start, end } = range;
    let builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.len())
        .header(CONTENT_RANGE, format!("bytes {start}-{end}/{file_size}"))
        .header(ACCEPT_RANGES, "bytes");

    finish(builder, body, StatusCode::INTERNAL_SERVER_ERROR)
}

fn text(status: StatusCode, message: &str) -> Builder {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_LENGTH, message.len())
}

/// Attach the body. A builder that rejected one of its headers is logged and
/// replaced by a bare `fallback` response.
fn finish(builder: Builder, body: ResponseBody, fallback: StatusCode) -> Response<ResponseBody> {
    builder.body(body).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build response: {e}"));
        let mut response = Response::new(body::empty());
        *response.status_mut() = fallback;
        response
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(resp: &'a Response<ResponseBody>, name: &str) -> &'a str {
        resp.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_416_headers() {
        let resp = build_416_response(1234);
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(header(&resp, "content-range"), "bytes */1234");
    }

    #[test]
    fn test_partial_headers() {
        let range = ByteRange { start: 10, end: 19 };
        let resp = build_partial_response(body::empty(), "text/plain", range, 100);
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(header(&resp, "content-range"), "bytes 10-19/100");
        assert_eq!(header(&resp, "content-length"), "10");
        assert_eq!(header(&resp, "accept-ranges"), "bytes");
    }

    #[test]
    fn test_text_headers() {
        let resp = build_text_response(StatusCode::NOT_FOUND, "File not found");
        assert_eq!(header(&resp, "content-type"), "text/plain; charset=utf-8");
        assert_eq!(header(&resp, "content-length"), "14");
    }

    #[test]
    fn test_html_head_keeps_length() {
        let resp = build_html_response("<p>x</p>".to_string(), true);
        assert_eq!(header(&resp, "content-length"), "8");
        assert_eq!(header(&resp, "content-type"), "text/html; charset=utf-8");
    }

    #[test]
    fn test_405_allow_header() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&resp, "allow"), "GET, HEAD");
    }
}
