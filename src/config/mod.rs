// Configuration module entry point
// Loads layered configuration and builds the immutable serving context

mod root;
mod state;
mod types;

// Re-export public types
pub use root::{parse_bind_address, RootContext};
pub use state::AppState;
pub use types::Config;

use crate::cli::Cli;

/// Environment variable prefix, e.g. `DIRSERVE_SERVER__PORT=9000`
const ENV_PREFIX: &str = "DIRSERVE";

impl Config {
    /// Load configuration with command-line values taking precedence.
    ///
    /// Layers, lowest first: built-in defaults, the config file (optional),
    /// `DIRSERVE_*` environment variables, command-line arguments.
    pub fn load(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let (host, port) = match cli.address.as_deref() {
            Some(address) => {
                let addr = parse_bind_address(address)?;
                (Some(addr.ip().to_string()), Some(i64::from(addr.port())))
            }
            None => (None, None),
        };

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.host", host)?
            .set_override_option("server.port", port)?
            .set_override_option("server.root", cli.root_override()?)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_without_file() {
        let cli = Cli::parse_from(["dirserve", "--config", "does-not-exist"]);
        let cfg = Config::load(&cli).unwrap();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.root, "./storage/");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.keep_alive);
    }

    #[test]
    fn test_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().display().to_string();
        let cli = Cli::parse_from([
            "dirserve",
            "127.0.0.1:9001",
            root.as_str(),
            "--config",
            "does-not-exist",
        ]);
        let cfg = Config::load(&cli).unwrap();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.server.root, root);
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(
            &file,
            "[server]\nport = 7070\n\n[logging]\naccess_log_format = \"json\"\n\n[performance]\nmax_connections = 16\n",
        )
        .unwrap();

        let path = file.display().to_string();
        let cli = Cli::parse_from(["dirserve", "--config", path.as_str()]);
        let cfg = Config::load(&cli).unwrap();

        assert_eq!(cfg.server.port, 7070);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.performance.max_connections, Some(16));
    }

    #[test]
    fn test_invalid_cli_address() {
        let cli = Cli::parse_from(["dirserve", "300.1.1.1:80", "--config", "does-not-exist"]);
        assert!(Config::load(&cli).is_err());
    }
}
