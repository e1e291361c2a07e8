//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Upload storage settings.
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Frontend serving settings.
    #[serde(default)]
    pub frontend: FrontendConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Busy timeout for SQLite connections, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory where uploaded reference files are written.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
}

/// Frontend serving configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    /// Directory holding `index.html` and the `static/` assets.
    #[serde(default = "default_frontend_dir")]
    pub dir: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "briefing_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "briefing.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dir: default_frontend_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `BRIEFING_HOST` overrides `server.host`
/// - `BRIEFING_PORT` overrides `server.port`
/// - `BRIEFING_DB_PATH` overrides `database.path`
/// - `BRIEFING_UPLOAD_DIR` overrides `uploads.dir`
/// - `BRIEFING_FRONTEND_DIR` overrides `frontend.dir`
/// - `BRIEFING_LOG_LEVEL` overrides `logging.level`
/// - `BRIEFING_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// The defaults reproduce the service's classic fixed layout: loopback port
/// 5000, `briefing.db`, `uploads/` and `frontend/` next to the binary.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("BRIEFING_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("BRIEFING_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(db_path) = std::env::var("BRIEFING_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(upload_dir) = std::env::var("BRIEFING_UPLOAD_DIR") {
        config.uploads.dir = upload_dir;
    }
    if let Ok(frontend_dir) = std::env::var("BRIEFING_FRONTEND_DIR") {
        config.frontend.dir = frontend_dir;
    }
    if let Ok(level) = std::env::var("BRIEFING_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("BRIEFING_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_layout() {
        let config = Config::default();
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.path, "briefing.db");
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.database.pool_max_size, 8);
        assert_eq!(config.uploads.dir, "uploads");
        assert_eq!(config.frontend.dir, "frontend");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn partial_file_falls_back_per_section() {
        let config: Config = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.database.path, "briefing.db");
        assert_eq!(config.uploads.dir, "uploads");
    }

    // Single test for everything that reads the process environment, so
    // parallel test threads never race on the BRIEFING_* variables.
    #[test]
    fn env_overrides_and_missing_file_fall_back() {
        std::env::set_var("BRIEFING_PORT", "9000");
        std::env::set_var("BRIEFING_UPLOAD_DIR", "/tmp/briefing-uploads");

        let config = load_config(Some("definitely-not-a-real-config.toml")).unwrap();

        std::env::remove_var("BRIEFING_PORT");
        std::env::remove_var("BRIEFING_UPLOAD_DIR");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.uploads.dir, "/tmp/briefing-uploads");
        // Untouched fields keep their defaults.
        assert_eq!(config.database.path, "briefing.db");
        assert_eq!(config.frontend.dir, "frontend");
    }
}
