// Configuration module entry point
// Layered configuration: TOML file, environment, hard defaults

mod state;
mod types;

use std::net::{AddrParseError, SocketAddr};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HeadersConfig, LoggingConfig, PerformanceConfig, PipelineConfig, ServerConfig,
    SiteConfig,
};

impl Config {
    /// Load configuration from the default `sitekit.toml` location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("sitekit")
    }

    /// Load configuration from the specified file path (without extension)
    ///
    /// Sources, later ones winning: built-in defaults, the TOML file (if it
    /// exists), then `SITEKIT`-prefixed environment variables with `__` as
    /// the section separator (e.g. `SITEKIT_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SITEKIT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = Config::load_from("definitely-not-a-real-config-file")
            .expect("defaults should load without a file");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.site.root, "_site");
        assert!(cfg.logging.access_log);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        let addr = cfg.socket_addr().expect("default address should parse");
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_socket_addr_rejects_garbage() {
        let mut cfg = Config::default();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}
