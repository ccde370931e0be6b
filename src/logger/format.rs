//! Access log lines
//!
//! `combined` and `common` follow the Apache/Nginx layouts, `json` writes one
//! object per line, and any other value is treated as a `$variable` pattern.

use chrono::{DateTime, Local};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request, as written to the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Path as received, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    /// "1.0", "1.1", "2"
    pub http_version: String,
    pub status: u16,
    /// Declared Content-Length of the response, 0 when absent
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Time until the response head was ready
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped now, with a 200/HTTP 1.1 baseline the caller overwrites
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            method,
            path,
            time: Local::now(),
            http_version: String::from("1.1"),
            status: 200,
            query: None,
            referer: None,
            user_agent: None,
            body_bytes: 0,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.combined(),
            "common" => self.common(),
            "json" => self.json(),
            pattern => self.substitute(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// `METHOD /path?query HTTP/version`
    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    /// Common layout plus quoted referer and user agent
    fn combined(&self) -> String {
        let referer = self.referer.as_deref().unwrap_or("-");
        let agent = self.user_agent.as_deref().unwrap_or("-");
        format!("{} \"{referer}\" \"{agent}\"", self.common())
    }

    fn common(&self) -> String {
        let Self {
            remote_addr,
            status,
            body_bytes,
            ..
        } = self;
        format!(
            "{remote_addr} - - [{}] \"{}\" {status} {body_bytes}",
            self.time.format(CLF_TIME),
            self.request_line(),
        )
    }

    fn json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Nginx-style variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$status`,
    /// `$body_bytes_sent`, `$http_referer`, `$http_user_agent` and
    /// `$request_time` (seconds, millisecond precision).
    fn substitute(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.request_time_us as f64 / 1e6;
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

        // Longer names first: $request_time and $request_uri before $request
        let substitutions = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{seconds:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", or_dash(&self.referer)),
            ("$http_user_agent", or_dash(&self.user_agent)),
        ];

        substitutions
            .iter()
            .fold(pattern.to_string(), |line, (name, value)| line.replace(name, value))
    }
}
