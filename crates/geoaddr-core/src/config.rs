use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://geoapi.heartrails.com/api/json";
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "geoaddr/0.1 (postal-lookup)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::str::FromStr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    }

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("GEOADDR_ENV", "development"));
    let bind_addr: SocketAddr = parse_as(
        "GEOADDR_BIND_ADDR",
        &or_default("GEOADDR_BIND_ADDR", "0.0.0.0:8080"),
    )?;
    let log_level = or_default("GEOADDR_LOG_LEVEL", "info");

    let db_max_connections: u32 = parse_as(
        "GEOADDR_DB_MAX_CONNECTIONS",
        &or_default("GEOADDR_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections: u32 = parse_as(
        "GEOADDR_DB_MIN_CONNECTIONS",
        &or_default("GEOADDR_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs: u64 = parse_as(
        "GEOADDR_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("GEOADDR_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let geocoder_base_url = or_default("GEOADDR_GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL);
    if geocoder_base_url.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEOADDR_GEOCODER_BASE_URL".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    let geocoder_timeout_secs: u64 = parse_as(
        "GEOADDR_GEOCODER_TIMEOUT_SECS",
        &or_default("GEOADDR_GEOCODER_TIMEOUT_SECS", "30"),
    )?;
    let geocoder_user_agent =
        or_default("GEOADDR_GEOCODER_USER_AGENT", DEFAULT_GEOCODER_USER_AGENT);
    let geocoder_max_retries: u32 = parse_as(
        "GEOADDR_GEOCODER_MAX_RETRIES",
        &or_default("GEOADDR_GEOCODER_MAX_RETRIES", "0"),
    )?;
    let geocoder_retry_backoff_ms: u64 = parse_as(
        "GEOADDR_GEOCODER_RETRY_BACKOFF_MS",
        &or_default("GEOADDR_GEOCODER_RETRY_BACKOFF_MS", "500"),
    )?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        geocoder_base_url,
        geocoder_timeout_secs,
        geocoder_user_agent,
        geocoder_max_retries,
        geocoder_retry_backoff_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
