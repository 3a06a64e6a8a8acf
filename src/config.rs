//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup and cached in memory.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for post-login redirects and CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Postgres connection string
    pub database_url: String,
    /// Identity provider base URL
    pub identity_url: String,
    /// Identity provider OAuth client ID (public)
    pub identity_client_id: String,
    /// Object storage base URL
    pub storage_url: String,

    // --- Secrets ---
    /// Identity provider OAuth client secret
    pub identity_client_secret: String,
    /// Object storage service key
    pub storage_service_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for signing the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            identity_url: env::var("IDENTITY_URL")
                .map_err(|_| ConfigError::Missing("IDENTITY_URL"))?,
            identity_client_id: env::var("IDENTITY_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("IDENTITY_CLIENT_ID"))?,
            storage_url: env::var("STORAGE_URL")
                .map_err(|_| ConfigError::Missing("STORAGE_URL"))?,

            identity_client_secret: env::var("IDENTITY_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("IDENTITY_CLIENT_SECRET"))?,
            storage_service_key: env::var("STORAGE_SERVICE_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STORAGE_SERVICE_KEY"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            database_url: "postgres://localhost/satas_test".to_string(),
            identity_url: "http://localhost:9999".to_string(),
            identity_client_id: "test_client_id".to_string(),
            storage_url: "http://localhost:9998".to_string(),
            identity_client_secret: "test_secret".to_string(),
            storage_service_key: "test_storage_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("DATABASE_URL", "postgres://localhost/satas");
        env::set_var("IDENTITY_URL", "http://localhost:9999");
        env::set_var("IDENTITY_CLIENT_ID", "test_id");
        env::set_var("IDENTITY_CLIENT_SECRET", "test_secret");
        env::set_var("STORAGE_URL", "http://localhost:9998");
        env::set_var("STORAGE_SERVICE_KEY", "test_key");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("OAUTH_STATE_KEY", "test_state_key");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.identity_client_id, "test_id");
        assert_eq!(config.identity_client_secret, "test_secret");
        assert_eq!(config.port, 8080);
    }
}
