//! Request failure translation
//!
//! Every failure in path resolution, metadata lookup, listing or file
//! streaming ends up here and becomes a short plain-text response.

use std::fmt;
use std::io;

use hyper::{Response, StatusCode};

use crate::http::{self, ResponseBody};
use crate::logger;

/// Failure of a single request
#[derive(Debug)]
pub enum ServeError {
    /// Target does not exist
    NotFound,
    /// Filesystem refused access
    PermissionDenied,
    /// Resolved path escapes the served root
    Forbidden,
    /// Requested byte range lies outside the file
    RangeNotSatisfiable { size: u64 },
    /// Anything else
    Internal(io::Error),
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PermissionDenied | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client; never carries paths or error details
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NotFound => "File not found",
            Self::PermissionDenied => "Permission denied",
            Self::Forbidden => "Forbidden",
            Self::RangeNotSatisfiable { .. } => "Range Not Satisfiable",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Log the failure and build the response for it.
    pub fn into_response(self, request_path: &str) -> Response<ResponseBody> {
        match &self {
            Self::Internal(err) => {
                logger::log_error(&format!("{request_path}: {err}"));
            }
            other => {
                logger::log_warning(&format!("{request_path}: {other}"));
            }
        }

        match self {
            Self::RangeNotSatisfiable { size } => http::build_416_response(size),
            other => http::build_text_response(other.status(), other.message()),
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Forbidden => write!(f, "path escapes the served root"),
            Self::RangeNotSatisfiable { size } => {
                write!(f, "range not satisfiable for {size} byte file")
            }
            Self::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Internal(err),
        }
    }
}
