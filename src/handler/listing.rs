//! Directory listing rendering
//!
//! Produces the HTML index page for a directory: one link per immediate
//! child, names escaped, sizes human readable.

use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::fs;

use super::error::ServeError;
use crate::logger;

/// Bytes left unencoded in hrefs, matching `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const STYLE: &str = r"  <style>
    body { font-family: sans-serif; }
    ul { list-style: none; padding: 0; }
    li { padding: 5px; }
    a { text-decoration: none; color: #0366d6; }
    a:hover { text-decoration: underline; }
    span { float: right; color: #666; }
  </style>
";

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// Read the immediate children of `dir`, sorted by name.
///
/// Symlinks are followed for the kind and size. Names that are not UTF-8
/// cannot be linked to and are left out. Any other failure aborts the whole
/// listing.
pub async fn read_entries(dir: &Path) -> Result<Vec<DirEntry>, ServeError> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            logger::log_warning(&format!(
                "Skipping non-UTF-8 name in listing: {}",
                entry.path().display()
            ));
            continue;
        };
        let metadata = fs::metadata(entry.path()).await?;
        entries.push(DirEntry {
            name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Render the listing page for `request_path` (as received, percent-encoded).
pub fn render_listing(request_path: &str, entries: &[DirEntry]) -> String {
    let base = if request_path.ends_with('/') {
        request_path.to_string()
    } else {
        format!("{request_path}/")
    };
    let display_path = percent_encoding::percent_decode_str(request_path).decode_utf8_lossy();
    let title = escape_html(&display_path);

    let mut html = String::with_capacity(1024 + entries.len() * 128);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str(&format!("  <title>Index of {title}</title>\n"));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("  <h1>Index of {title}</h1>\n  <hr>\n  <ul>\n"));

    if let Some(parent) = parent_href(&base) {
        html.push_str(&format!(
            "    <li><a href=\"{}\">../</a></li>\n",
            escape_html(parent)
        ));
    }

    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        let href = format!("{base}{}{suffix}", utf8_percent_encode(&entry.name, COMPONENT));
        let size = if entry.is_dir {
            "-".to_string()
        } else {
            format_file_size(entry.size)
        };

        html.push_str(&format!(
            "    <li><a href=\"{}\">{}{suffix}</a><span>{size}</span></li>\n",
            escape_html(&href),
            escape_html(&entry.name),
        ));
    }

    html.push_str("  </ul>\n  <hr>\n</body>\n</html>\n");
    html
}

/// Absolute link to the directory above `base` (which ends in `/`), `None`
/// at the root. Relative `../` would skip a level for slashless URLs.
fn parent_href(base: &str) -> Option<&str> {
    let trimmed = base.trim_end_matches('/');
    let cut = trimmed.rfind('/')?;
    Some(&base[..=cut])
}

/// Human readable size with base-1024 units and two decimals.
///
/// Zero is `0 B`; anything past the GB range stays in GB.
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    format!("{:.2} {}", bytes as f64 / scale as f64, SIZE_UNITS[unit])
}

/// Escape text for HTML content and double-quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
