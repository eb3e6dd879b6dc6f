use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub geocoding_api_url: String,
    pub courier_api_url: String,
    pub exchange_api_url: Option<String>,
    pub provider_timeout_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let geocoding_api_url = env_map
            .get("GEOCODING_API_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("GEOCODING_API_URL".to_string()))?;

        let courier_api_url = env_map
            .get("COURIER_API_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("COURIER_API_URL".to_string()))?;

        // Optional: without it, foreign-currency quotes stay unconverted and
        // are flagged on the result.
        let exchange_api_url = env_map.get("EXCHANGE_API_URL").cloned();

        let provider_timeout_ms = env_map
            .get("PROVIDER_TIMEOUT_MS")
            .map(|s| s.as_str())
            .unwrap_or("10000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "PROVIDER_TIMEOUT_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        if provider_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "PROVIDER_TIMEOUT_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            port,
            database_path,
            geocoding_api_url,
            courier_api_url,
            exchange_api_url,
            provider_timeout_ms,
        })
    }
}
