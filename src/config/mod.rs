use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

// Top-level configuration, one sub-struct per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub venue: VenueConfig,
    pub allocation: AllocationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Where the seat inventory is loaded from at startup
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub snapshot_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllocationConfig {
    pub max_party_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "seat_allocator=debug,tower_http=debug".to_string(),
            },
            venue: VenueConfig {
                snapshot_path: "venue.json".to_string(),
            },
            allocation: AllocationConfig { max_party_size: 20 },
        }
    }
}

fn var_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let max_party_size = parse_var("MAX_PARTY_SIZE", defaults.allocation.max_party_size)?;
        if max_party_size == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_PARTY_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", defaults.app.host),
                port: parse_var("PORT", defaults.app.port)?,
                environment: var_or("ENVIRONMENT", defaults.app.environment),
                rust_log: var_or("RUST_LOG", defaults.app.rust_log),
            },
            venue: VenueConfig {
                snapshot_path: var_or("VENUE_FILE", defaults.venue.snapshot_path),
            },
            allocation: AllocationConfig { max_party_size },
        })
    }
}
