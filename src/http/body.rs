//! Response body module
//!
//! One boxed body type for every response: in-memory bytes for small
//! generated content, and a chunked file stream for file contents.

use futures::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

/// Read size for each streamed chunk
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Body type shared by all responses
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Body with no content (HEAD responses, build failures)
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body backed by bytes already in memory
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream at most `len` bytes from the file's current position.
///
/// Chunks are only read when hyper polls for the next frame, so a slow client
/// pauses disk reads. Dropping the body closes the file.
pub fn file_stream(file: File, len: u64) -> ResponseBody {
    let stream =
        ReaderStream::with_capacity(file.take(len), STREAM_CHUNK_SIZE).map_ok(Frame::data);
    StreamBody::new(stream).boxed_unsync()
}
