use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_API_BASE_URI: &str = "/api";
const DEFAULT_CREDENTIALS_PATH: &str = "users.json";
const DEFAULT_CLASSIFY_API_URL: &str = "https://classify.roboflow.com";
const DEFAULT_CLASSIFY_MODEL_ID: &str = "handetect-av6rs/1";
const DEFAULT_CLASSIFY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub credentials_path: PathBuf,
    pub classify_api_url: String,
    pub classify_model_id: String,
    pub classify_api_key: String,
    pub classify_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unparseable
    /// numbers fall back to their defaults; only the API key is mandatory.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let classify_api_key = lookup("CLASSIFY_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("CLASSIFY_API_KEY"))?;

        Ok(Config {
            server_host: or_default("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            api_base_uri: or_default("API_BASE_URI", DEFAULT_API_BASE_URI),
            credentials_path: PathBuf::from(or_default(
                "CREDENTIALS_PATH",
                DEFAULT_CREDENTIALS_PATH,
            )),
            classify_api_url: or_default("CLASSIFY_API_URL", DEFAULT_CLASSIFY_API_URL)
                .trim_end_matches('/')
                .to_string(),
            classify_model_id: or_default("CLASSIFY_MODEL_ID", DEFAULT_CLASSIFY_MODEL_ID),
            classify_api_key,
            classify_timeout_secs: lookup("CLASSIFY_TIMEOUT_SECS")
                .map(|v| v.trim_end_matches('s').to_string())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLASSIFY_TIMEOUT_SECS),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }
}
