//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::path::PathBuf;
use std::time::Duration;

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
    pub gemini_api_key: String,
    /// Base URL of the OpenAI-compatibility endpoint the adapters talk to.
    pub gemini_api_base: String,
    pub log_level: Level,
    /// Path of the serialized profile blob.
    pub storage_path: PathBuf,
    pub recipe_model: String,
    pub image_model: String,
    pub image_model_hq: String,
    /// Upper bound for one external call; a hung request surfaces as a
    /// generation failure rather than blocking the session.
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))?;

        let gemini_api_base = std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| {
            "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
        });

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let storage_path = std::env::var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./chefsync_profiles.json"));

        // --- Load Adapter-specific Settings ---
        let recipe_model = std::env::var("RECIPE_MODEL")
            .unwrap_or_else(|_| "gemini-3-flash-preview".to_string());
        let image_model = std::env::var("IMAGE_MODEL")
            .unwrap_or_else(|_| "gemini-2.5-flash-image".to_string());
        let image_model_hq = std::env::var("IMAGE_MODEL_HQ")
            .unwrap_or_else(|_| "gemini-3-pro-image-preview".to_string());

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "REQUEST_TIMEOUT_SECS".to_string(),
                    format!("'{raw}' is not a number of seconds"),
                )
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            gemini_api_key,
            gemini_api_base,
            log_level,
            storage_path,
            recipe_model,
            image_model,
            image_model_hq,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
