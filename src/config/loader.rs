//! Load [`AppConfig`] from environment variables.

use std::env::VarError;
use std::str::FromStr;

use crate::config::types::AppConfig;
use crate::error::ConfigError;

impl AppConfig {
    /// Read `DATABASE_URL`, `BIND_ADDR`, `API_PREFIX`, `DB_MAX_CONNECTIONS`,
    /// `MAX_BODY_BYTES` and `STRICT_STATUS_CODES`; unset keys keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, VarError>,
    {
        let read = |key: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(key) {
                Ok(value) => Ok(Some(value)),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { key }),
            }
        };

        let mut config = AppConfig::default();
        if let Some(url) = read("DATABASE_URL")? {
            config.database_url = url;
        }
        if let Some(raw) = read("BIND_ADDR")? {
            config.bind_addr = parse_value("BIND_ADDR", &raw)?;
        }
        if let Some(raw) = read("API_PREFIX")? {
            config.api_prefix = normalize_prefix(&raw);
        }
        if let Some(raw) = read("DB_MAX_CONNECTIONS")? {
            config.db_max_connections = parse_value::<u32>("DB_MAX_CONNECTIONS", &raw)?.max(1);
        }
        if let Some(raw) = read("MAX_BODY_BYTES")? {
            config.max_body_bytes = parse_value("MAX_BODY_BYTES", &raw)?;
        }
        if let Some(raw) = read("STRICT_STATUS_CODES")? {
            config.strict_status_codes = parse_bool_value("STRICT_STATUS_CODES", &raw)?;
        }
        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_bool_value(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

/// `"api/"` → `"/api"`, `"/"` → `""`.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
