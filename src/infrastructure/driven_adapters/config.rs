//! Application Configuration
//!
//! Loads configuration from files and environment variables.

use std::fmt;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// JWT configuration; the secret is wiped from memory on drop
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_secs: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

/// Request and dataset size limits
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Largest accepted request body, also the cap on fetched datasets
    pub max_body_bytes: usize,
    /// Largest accepted dataset
    pub max_rows: usize,
    pub fetch_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
            max_rows: 100_000,
            fetch_timeout_secs: 30,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a source cannot be read or a field is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "default".into());

        Config::builder()
            .add_source(File::with_name("config/default").required(true))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // e.g. APP__LIMITS__MAX_ROWS
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_debug_hides_secret() {
        let jwt = JwtConfig {
            secret: "super-secret".to_string(),
            expires_in_secs: 60,
        };
        let rendered = format!("{jwt:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_limits_default_when_absent() {
        let config: AppConfig = Config::builder()
            .set_override("server.host", "127.0.0.1")
            .and_then(|b| b.set_override("server.port", 8080))
            .and_then(|b| b.set_override("database.url", "postgres://localhost/db"))
            .and_then(|b| b.set_override("database.max_connections", 5))
            .and_then(|b| b.set_override("database.min_connections", 1))
            .and_then(|b| b.set_override("jwt.secret", "s"))
            .and_then(|b| b.set_override("jwt.expires_in_secs", 60))
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.limits.max_rows, 100_000);
        assert_eq!(config.server.port, 8080);
    }
}
