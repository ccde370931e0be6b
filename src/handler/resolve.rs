//! Request path resolution
//!
//! Maps a raw (percent-encoded) request path onto the served root and
//! refuses anything that would land outside of it.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use tokio::fs;

use super::error::ServeError;
use crate::config::RootContext;
use crate::logger;

/// Resolve a raw request path to a canonical path inside the root.
///
/// The lexical walk rejects `..` that climbs above the root before the
/// filesystem is touched; the canonical check afterwards catches symlinks
/// pointing outside. Containment is checked per path component, so a root of
/// `/srv/www` never admits `/srv/www-private`.
pub async fn resolve_path(ctx: &RootContext, raw_path: &str) -> Result<PathBuf, ServeError> {
    let decoded = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| ServeError::NotFound)?;

    if decoded.contains('\0') {
        logger::log_warning(&format!("NUL byte in request path: {raw_path}"));
        return Err(ServeError::Forbidden);
    }

    let relative = normalize(&decoded).ok_or_else(|| {
        logger::log_warning(&format!("Path traversal attempt blocked: {raw_path}"));
        ServeError::Forbidden
    })?;

    let root = ctx.root();
    let canonical = fs::canonicalize(root.join(relative)).await?;

    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            raw_path,
            canonical.display()
        ));
        return Err(ServeError::Forbidden);
    }

    Ok(canonical)
}

/// Turn a decoded request path into a root-relative path.
///
/// Returns `None` when a `..` would climb above the root or the path
/// carries a platform prefix such as a drive letter.
fn normalize(decoded: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();

    for component in Path::new(decoded).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::CurDir | Component::RootDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return None;
                }
            }
            Component::Prefix(_) => return None,
        }
    }

    Some(relative)
}
