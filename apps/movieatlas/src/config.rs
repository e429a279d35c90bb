//! Configuration module for MovieAtlas.
//!
//! Loads configuration from `config.toml` with environment variable overrides.
//! A usable TMDB access token is a hard startup requirement; validation runs
//! before the server starts.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Placeholder shipped in the sample config; startup refuses to run with it.
pub const PLACEHOLDER_TOKEN: &str = "REPLACE_WITH_TMDB_V4_TOKEN";

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// TMDB API configuration (v4 bearer-token auth)
#[derive(Clone, Deserialize)]
pub struct TmdbConfig {
    pub access_token: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Custom Debug implementation to avoid exposing the access token
impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` in current directory (optional)
    /// 3. Environment variables with `ATLAS_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `ATLAS_SERVER__PORT=9000` sets `server.port`
    /// - `ATLAS_TMDB__ACCESS_TOKEN=...` sets `tmdb.access_token`
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            // Start with defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("tmdb.base_url", DEFAULT_BASE_URL)?
            .set_default("tmdb.image_base_url", DEFAULT_IMAGE_BASE_URL)?
            .set_default("tmdb.timeout_secs", 15)?
            // Add config file (optional)
            .add_source(File::with_name(config_path).required(false))
            // Override with environment variables
            // ATLAS_TMDB__ACCESS_TOKEN=... -> tmdb.access_token = ...
            .add_source(
                Environment::with_prefix("ATLAS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the TMDB section is usable.
    ///
    /// Missing or placeholder credentials are a fatal configuration error.
    pub fn validate(&self) -> Result<(), AppError> {
        let token = self.tmdb.access_token.as_deref().unwrap_or("");
        if token.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "TMDB access token is not configured (set tmdb.access_token in config.toml \
                 or ATLAS_TMDB__ACCESS_TOKEN)"
                    .to_string(),
            ));
        }
        if token.contains(PLACEHOLDER_TOKEN) {
            return Err(AppError::InvalidConfig(
                "TMDB access token is still the placeholder value; add your v4 API Read \
                 Access Token from themoviedb.org"
                    .to_string(),
            ));
        }
        if self.tmdb.base_url.trim().is_empty() || self.tmdb.image_base_url.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "TMDB base_url and image_base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::{IpAddr, SocketAddr};
        let ip: IpAddr = self.server.host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid host '{}', using 0.0.0.0", self.server.host);
            "0.0.0.0".parse().unwrap()
        });
        SocketAddr::new(ip, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: Option<&str>) -> Config {
        Config {
            server: ServerConfig::default(),
            tmdb: TmdbConfig {
                access_token: token.map(|t| t.to_string()),
                ..TmdbConfig::default()
            },
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::load_from("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.tmdb.timeout_secs, 15);
    }

    #[test]
    fn test_server_addr() {
        let config = Config::load_from("nonexistent.toml").unwrap();
        let addr = config.server_addr();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_missing_token_rejected() {
        assert!(config_with_token(None).validate().is_err());
        assert!(config_with_token(Some("  ")).validate().is_err());
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let config = config_with_token(Some(PLACEHOLDER_TOKEN));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_real_token_accepted() {
        let config = config_with_token(Some("eyJhbGciOiJIUzI1NiJ9.test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let config = config_with_token(Some("super-secret"));
        let debug = format!("{:?}", config.tmdb);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
