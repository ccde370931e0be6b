//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from request handling:
//! body types, response builders, MIME detection and Range parsing.

pub mod body;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{build_405_response, build_416_response, build_text_response};
