//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults suitable for local development.

use std::env;
use std::path::PathBuf;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub http_port: u16,

    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Whether to install a permissive CORS layer (browser dev setups).
    pub cors_permissive: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Variables
    /// - `BILLING_HTTP_PORT` (default: 5000)
    /// - `BILLING_DB_PATH` (default: ./billing.db)
    /// - `BILLING_CORS_PERMISSIVE` (default: true)
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("BILLING_HTTP_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BILLING_HTTP_PORT".to_string()))?,

            database_path: env::var("BILLING_DB_PATH")
                .unwrap_or_else(|_| "billing.db".to_string())
                .into(),

            cors_permissive: env::var("BILLING_CORS_PERMISSIVE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only assert defaults for variables this test does not set, to
        // stay independent of the ambient environment.
        let config = ServerConfig {
            http_port: 5000,
            database_path: PathBuf::from("billing.db"),
            cors_permissive: true,
        };
        assert_eq!(config.http_port, 5000);
        assert!(config.cors_permissive);
    }
}
