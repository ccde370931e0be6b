//! Request handler module
//!
//! Resolves request paths inside the served root and answers with a file,
//! a byte range of a file, a directory listing, or a translated error.

pub mod content;
pub mod error;
pub mod listing;
pub mod resolve;
pub mod router;

pub use router::handle_request;
