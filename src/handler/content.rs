//! File content responses
//!
//! Streams a whole file or a single byte range of it. Bytes are pulled from
//! disk only as the connection drains them.

use std::io::SeekFrom;
use std::path::Path;

use hyper::Response;
use tokio::fs::File;
use tokio::io::AsyncSeekExt;

use super::error::ServeError;
use crate::http::{self, body, mime, ByteRange, RangeParseResult, ResponseBody};

/// Serve `path` (a regular or file-like object of `file_size` bytes).
///
/// Range outcomes:
/// - valid single range: 206 with exactly that interval
/// - outside the file or multi-range: [`ServeError::RangeNotSatisfiable`]
/// - absent or malformed: 200 with the whole file
pub async fn serve_file(
    path: &Path,
    file_size: u64,
    range_header: Option<&str>,
    is_head: bool,
) -> Result<Response<ResponseBody>, ServeError> {
    let content_type = mime::content_type_for(path);

    match http::parse_range_header(range_header, file_size) {
        RangeParseResult::Valid(range) => {
            let body = if is_head {
                body::empty()
            } else {
                open_range(path, range).await?
            };
            Ok(http::response::build_partial_response(
                body,
                &content_type,
                range,
                file_size,
            ))
        }
        RangeParseResult::NotSatisfiable => {
            Err(ServeError::RangeNotSatisfiable { size: file_size })
        }
        RangeParseResult::None => {
            let body = if is_head {
                body::empty()
            } else {
                let file = File::open(path).await?;
                body::file_stream(file, file_size)
            };
            Ok(http::response::build_file_response(
                body,
                &content_type,
                file_size,
            ))
        }
    }
}

async fn open_range(path: &Path, range: ByteRange) -> Result<ResponseBody, ServeError> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(range.start)).await?;
    Ok(body::file_stream(file, range.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    async fn body_bytes(resp: Response<ResponseBody>) -> Vec<u8> {
        resp.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    fn fixture(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_full_file() {
        let (_dir, path) = fixture(b"hello world");
        let resp = serve_file(&path, 11, None, false).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-length"], "11");
        assert_eq!(resp.headers()["content-type"], "text/plain");
        assert_eq!(body_bytes(resp).await, b"hello world");
    }

    #[tokio::test]
    async fn test_range_middle() {
        let (_dir, path) = fixture(b"0123456789");
        let resp = serve_file(&path, 10, Some("bytes=2-5"), false).await.unwrap();

        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()["content-range"], "bytes 2-5/10");
        assert_eq!(resp.headers()["content-length"], "4");
        assert_eq!(body_bytes(resp).await, b"2345");
    }

    #[tokio::test]
    async fn test_range_open_ended_and_suffix() {
        let (_dir, path) = fixture(b"0123456789");

        let resp = serve_file(&path, 10, Some("bytes=7-"), false).await.unwrap();
        assert_eq!(body_bytes(resp).await, b"789");

        let resp = serve_file(&path, 10, Some("bytes=-3"), false).await.unwrap();
        assert_eq!(resp.headers()["content-range"], "bytes 7-9/10");
        assert_eq!(body_bytes(resp).await, b"789");
    }

    #[tokio::test]
    async fn test_range_out_of_bounds() {
        let (_dir, path) = fixture(b"0123456789");
        let err = serve_file(&path, 10, Some("bytes=10-10"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ServeError::RangeNotSatisfiable { size: 10 }));
    }

    #[tokio::test]
    async fn test_head_skips_body() {
        let (_dir, path) = fixture(b"0123456789");
        let resp = serve_file(&path, 10, None, true).await.unwrap();

        assert_eq!(resp.headers()["content-length"], "10");
        assert!(body_bytes(resp).await.is_empty());
    }
}
