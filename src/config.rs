use std::{str::FromStr, time::Duration};

use rpg_persistence_sea_orm::{DatabaseUrlError, database_url_from_env};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    DatabaseUrl(#[from] DatabaseUrlError),
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

fn var_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: database_url_from_env()?,
            max_connections: var_or("RPG_DATABASE_MAX_CONNECTIONS", 5)?,
            host: std::env::var("RPG_HTTP_API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: var_or("RPG_HTTP_API_PORT", 8080)?,
            request_timeout: Duration::from_secs(var_or("RPG_REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}
