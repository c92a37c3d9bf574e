//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Flat content directory for uploaded images and pdfs.
    pub uploads_dir: PathBuf,
    /// HMAC secret for signing auth tokens.
    pub jwt_secret: String,
    /// Origin allowed to call the API from a browser.
    pub cors_origin: String,
    pub cashfree_base_url: String,
    pub cashfree_app_id: String,
    pub cashfree_secret_key: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        // --- Load Auth Settings ---
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        // --- Load Payment Processor Settings ---
        let cashfree_base_url = std::env::var("CASHFREE_BASE_URL")
            .unwrap_or_else(|_| "https://sandbox.cashfree.com/pg".to_string());
        let cashfree_app_id = std::env::var("CASHFREE_APP_ID")
            .map_err(|_| ConfigError::MissingVar("CASHFREE_APP_ID".to_string()))?;
        let cashfree_secret_key = std::env::var("CASHFREE_SECRET_KEY")
            .map_err(|_| ConfigError::MissingVar("CASHFREE_SECRET_KEY".to_string()))?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            uploads_dir,
            jwt_secret,
            cors_origin,
            cashfree_base_url,
            cashfree_app_id,
            cashfree_secret_key,
        })
    }
}
