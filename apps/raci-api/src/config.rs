//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading with validation: required variables must be present
//! and valid, or the application exits with a clear error message.

use std::env;
use thiserror::Error;

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to parse port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Tracing filter directive (e.g., "info,raci=debug")
    pub rust_log: String,

    /// Allowed CORS origins (comma-separated URLs or "*" for development)
    pub cors_origins: Vec<String>,

    /// Server bind address
    pub host: String,

    /// Server listen port
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Maximum accepted import upload size in bytes
    pub max_import_file_size: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[redacted]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_size", &self.max_body_size)
            .field("max_import_file_size", &self.max_import_file_size)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required Variables
    ///
    /// - `DATABASE_URL` - PostgreSQL connection string
    ///
    /// # Optional Variables
    ///
    /// - `RUST_LOG` - Log level filter (default: "info")
    /// - `CORS_ORIGINS` - Comma-separated allowed origins (default: "*")
    /// - `HOST` - Bind address (default: "0.0.0.0")
    /// - `PORT` - Listen port (default: 8080)
    /// - `MAX_BODY_SIZE` - Request body limit in bytes (default: 12MB)
    /// - `MAX_IMPORT_FILE_SIZE` - Import upload limit in bytes (default: 10MB)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development only)
        let _ = dotenvy::dotenv();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        if port == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PORT".to_string(),
                message: "Port must be between 1 and 65535".to_string(),
            });
        }

        // Body limit defaults slightly above the import upload limit so a
        // maximum-size CSV still fits in its multipart envelope.
        let max_body_size = parse_size_var("MAX_BODY_SIZE", 12 * 1024 * 1024)?;
        let max_import_file_size = parse_size_var("MAX_IMPORT_FILE_SIZE", 10 * 1024 * 1024)?;

        Ok(Config {
            database_url,
            rust_log,
            cors_origins,
            host,
            port,
            max_body_size,
            max_import_file_size,
        })
    }

    /// Get the server bind address as a socket address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse an optional byte-size environment variable.
fn parse_size_var(var: &str, default: usize) -> Result<usize, ConfigError> {
    match env::var(var) {
        Err(_) => Ok(default),
        Ok(s) => s.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("'{s}' is not a valid byte count"),
        }),
    }
}
