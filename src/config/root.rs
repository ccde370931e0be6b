// Root context module
// Validated, immutable serving context built once at startup

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};

use super::types::ServerConfig;

/// Canonical root directory plus bind address.
///
/// Built once from [`ServerConfig`] and shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootContext {
    root: PathBuf,
    ip: Ipv4Addr,
    port: u16,
}

impl RootContext {
    /// Validate the server section and canonicalize the root directory.
    pub fn from_config(server: &ServerConfig) -> Result<Self, String> {
        let addr = parse_bind_address(&format!("{}:{}", server.host, server.port))?;
        let root = canonical_root(Path::new(&server.root))?;

        Ok(Self {
            root,
            ip: *addr.ip(),
            port: addr.port(),
        })
    }

    /// Build a context around an existing directory, mainly for tests.
    pub fn with_root(root: &Path) -> Result<Self, String> {
        Ok(Self {
            root: canonical_root(root)?,
            ip: Ipv4Addr::LOCALHOST,
            port: 0,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ip, self.port))
    }
}

/// Parse an `ip:port` bind address.
///
/// The ip must be a dotted quad with every octet in 0-255 and the port must
/// fit in 0-65535.
pub fn parse_bind_address(address: &str) -> Result<SocketAddrV4, String> {
    let Some((ip, port)) = address.split_once(':') else {
        return Err(format!("Invalid address '{address}': expected ip:port"));
    };

    let ip = ip
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid ip '{ip}': {e}"))?;
    let port = port
        .parse::<u16>()
        .map_err(|e| format!("Invalid port '{port}': {e}"))?;

    Ok(SocketAddrV4::new(ip, port))
}

fn canonical_root(root: &Path) -> Result<PathBuf, String> {
    let canonical = root
        .canonicalize()
        .map_err(|e| format!("Invalid path '{}': {e}", root.display()))?;

    if !canonical.is_dir() {
        return Err(format!("Invalid path '{}': not a directory", root.display()));
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_address() {
        let addr = parse_bind_address("127.0.0.1:8080").unwrap();
        assert_eq!(*addr.ip(), Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(addr.port(), 8080);

        let addr = parse_bind_address("0.0.0.0:0").unwrap();
        assert_eq!(addr.port(), 0);
    }

    #[test]
    fn test_parse_invalid_address() {
        assert!(parse_bind_address("127.0.0.1").is_err());
        assert!(parse_bind_address("256.0.0.1:80").is_err());
        assert!(parse_bind_address("1.2.3:80").is_err());
        assert!(parse_bind_address("1.2.3.4:70000").is_err());
        assert!(parse_bind_address("1.2.3.4:-1").is_err());
        assert!(parse_bind_address("1.2.3.4:80:81").is_err());
    }

    #[test]
    fn test_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();

        assert!(RootContext::with_root(dir.path()).is_ok());
        assert!(RootContext::with_root(&file).is_err());
        assert!(RootContext::with_root(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            root: dir.path().display().to_string(),
            workers: None,
        };

        let ctx = RootContext::from_config(&server).unwrap();
        assert_eq!(ctx.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(ctx.root(), dir.path().canonicalize().unwrap());
    }
}
