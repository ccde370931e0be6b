//! Process-wide logging
//!
//! Leveled server messages plus the access log. Until [`init`] runs,
//! everything goes to the console unfiltered.

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::{Config, RootContext};
use hyper::Version;

pub fn init(config: &Config) -> std::io::Result<()> {
    let logging = &config.logging;
    let level = Level::parse(&logging.level).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid log level '{}'", logging.level),
        )
    })?;

    writer::init(
        level,
        logging.access_log_file.as_deref(),
        logging.error_log_file.as_deref(),
    )
}

fn enabled(level: Level) -> bool {
    writer::get().is_none_or(|w| w.enabled(level))
}

enum Stream {
    Info,
    Error,
    Access,
}

fn emit(stream: &Stream, message: &str) {
    match (writer::get(), stream) {
        (Some(w), Stream::Info) => w.write_info(message),
        (Some(w), Stream::Error) => w.write_error(message),
        (Some(w), Stream::Access) => w.write_access(message),
        (None, Stream::Error) => eprintln!("{message}"),
        (None, _) => println!("{message}"),
    }
}

pub fn log_server_start(root: &RootContext, config: &Config) {
    let mut lines = vec![
        format!("dirserve listening on http://{}", root.socket_addr()),
        format!("  root:       {}", root.root().display()),
        format!("  log level:  {}", config.logging.level),
    ];
    if let Some(workers) = config.server.workers {
        lines.push(format!("  workers:    {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        lines.push(format!("  max conns:  {max}"));
    }
    if let Some(path) = &config.logging.access_log_file {
        lines.push(format!("  access log: {path}"));
    }
    if let Some(path) = &config.logging.error_log_file {
        lines.push(format!("  error log:  {path}"));
    }

    for line in lines {
        emit(&Stream::Info, &line);
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

fn log_at(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    let (tag, stream) = match level {
        Level::Error => ("ERROR", Stream::Error),
        Level::Warn => ("WARN", Stream::Error),
        Level::Info => ("INFO", Stream::Info),
        Level::Debug => ("DEBUG", Stream::Info),
    };
    emit(&stream, &format!("[{tag}] {message}"));
}

pub fn log_error(message: &str) {
    log_at(Level::Error, message);
}

pub fn log_warning(message: &str) {
    log_at(Level::Warn, message);
}

pub fn log_info(message: &str) {
    log_at(Level::Info, message);
}

pub fn log_debug(message: &str) {
    log_at(Level::Debug, message);
}

/// Access lines are never level-filtered
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    emit(&Stream::Access, &entry.format(format));
}

/// Version label as written in request lines ("1.1", "2")
pub fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
