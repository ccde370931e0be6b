//! Log sinks
//!
//! Two sinks per process: one for access and info lines, one for warnings
//! and errors. Each is either the console or an append-mode file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static SINKS: OnceLock<LogWriter> = OnceLock::new();

/// Severity of a non-access log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Parse a configured level name, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" | "trace" => Some(Self::Debug),
            _ => None,
        }
    }
}

enum Sink {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl Sink {
    /// File sink when a path is configured, `console` otherwise
    fn open(path: Option<&str>, console: Self) -> io::Result<Self> {
        let Some(path) = path else {
            return Ok(console);
        };

        let path = Path::new(path);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::File(Mutex::new(file)))
    }

    /// Failed writes are dropped; logging never takes a request down
    fn line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut file) = file.lock() {
                    let _ = writeln!(file, "{message}");
                }
            }
        }
    }
}

pub struct LogWriter {
    level: Level,
    access: Sink,
    error: Sink,
}

impl LogWriter {
    fn new(level: Level, access_file: Option<&str>, error_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            level,
            access: Sink::open(access_file, Sink::Stdout)?,
            error: Sink::open(error_file, Sink::Stderr)?,
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn write_access(&self, message: &str) {
        self.access.line(message);
    }

    /// Warnings and errors
    pub fn write_error(&self, message: &str) {
        self.error.line(message);
    }

    /// Info and debug lines share the access sink
    pub fn write_info(&self, message: &str) {
        self.access.line(message);
    }
}

/// Install the process-wide writer. Fails if a log file cannot be opened or
/// the writer is already installed.
pub fn init(level: Level, access_file: Option<&str>, error_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(level, access_file, error_file)?;
    SINKS
        .set(writer)
        .map_err(|_| io::Error::new(io::ErrorKind::AlreadyExists, "logger initialized twice"))
}

/// The installed writer, `None` before [`init`]
pub fn get() -> Option<&'static LogWriter> {
    SINKS.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse_and_order() {
        assert_eq!(Level::parse("INFO"), Some(Level::Info));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("verbose"), None);
        assert!(Level::Error < Level::Debug);
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let access = dir.path().join("logs/access.log");
        let access_str = access.display().to_string();

        let writer = LogWriter::new(Level::Warn, Some(&access_str), None).unwrap();
        writer.write_access("first");
        writer.write_access("second");
        assert!(writer.enabled(Level::Error));
        assert!(!writer.enabled(Level::Info));

        assert_eq!(fs::read_to_string(&access).unwrap(), "first\nsecond\n");
    }
}
