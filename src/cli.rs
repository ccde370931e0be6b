//! Command-line interface
//!
//! ```bash
//! dirserve                          # 0.0.0.0:8080, serving ./storage/
//! dirserve 127.0.0.1:9000           # serving the current directory
//! dirserve 127.0.0.1:9000 /srv/www  # serving /srv/www
//! ```

use clap::Parser;

/// Serve a directory over HTTP with listings and byte-range support
#[derive(Debug, Clone, Parser)]
#[command(name = "dirserve", version)]
pub struct Cli {
    /// Bind address as ip:port, e.g. 0.0.0.0:8080
    pub address: Option<String>,

    /// Directory to serve (defaults to the current directory when ADDRESS is given)
    pub root: Option<String>,

    /// Configuration file, extension optional
    #[arg(short, long, default_value = "dirserve", env = "DIRSERVE_CONFIG")]
    pub config: String,
}

impl Cli {
    /// Root directory given on the command line, if any.
    ///
    /// An explicit address without a root serves the working directory, so
    /// the configured root only applies when neither is given.
    pub fn root_override(&self) -> std::io::Result<Option<String>> {
        match (&self.address, &self.root) {
            (_, Some(root)) => Ok(Some(root.clone())),
            (Some(_), None) => {
                let cwd = std::env::current_dir()?;
                Ok(Some(cwd.display().to_string()))
            }
            (None, None) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::parse_from(["dirserve"]);
        assert!(cli.address.is_none());
        assert_eq!(cli.root_override().unwrap(), None);
    }

    #[test]
    fn test_address_only_serves_cwd() {
        let cli = Cli::parse_from(["dirserve", "127.0.0.1:8080"]);
        let cwd = std::env::current_dir().unwrap().display().to_string();
        assert_eq!(cli.root_override().unwrap(), Some(cwd));
    }

    #[test]
    fn test_address_and_root() {
        let cli = Cli::parse_from(["dirserve", "127.0.0.1:8080", "/srv/www"]);
        assert_eq!(cli.address.as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(cli.root_override().unwrap(), Some("/srv/www".to_string()));
    }
}
