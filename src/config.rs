use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::utils::error::{AppError, AppResult};

/// Everything the process needs, loaded once at startup and handed to each
/// component at construction. No component reads the environment after this.
pub struct Config {
    pub server_addr: String,
    pub cors_origin: String,
    pub mongo_uri: String,
    pub db_name: String,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

impl Config {
    pub fn load() -> AppResult<Self> {
        Ok(Self {
            server_addr: try_load("SERVER_ADDR", "0.0.0.0:8000"),
            cors_origin: try_load("CORS_ORIGIN", "http://localhost:5173"),
            mongo_uri: require("MONGO_URI")?,
            db_name: require("DB_NAME")?,
            access_token_secret: require("ACCESS_TOKEN_SECRET")?,
            refresh_token_secret: require("REFRESH_TOKEN_SECRET")?,
            // 15 minutes / 7 days
            access_token_ttl_secs: try_load("ACCESS_TOKEN_TTL_SECS", "900"),
            refresh_token_ttl_secs: try_load("REFRESH_TOKEN_TTL_SECS", "604800"),
        })
    }
}

fn require(key: &str) -> AppResult<String> {
    env::var(key).map_err(|_| AppError::InternalError(format!("{key} must be set")))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
