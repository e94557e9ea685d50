use std::env;

use crate::config::ConfigError;

/// First non-empty value among `keys`; errors name the first key.
pub(crate) fn require_non_empty_env(keys: &[&str]) -> Result<String, ConfigError> {
    keys.iter()
        .find_map(|key| optional_trimmed_env(key))
        .ok_or_else(|| {
            ConfigError::MissingVar(keys.first().copied().unwrap_or_default().to_string())
        })
}

pub(crate) fn parse_u32_env(key: &str, default: u32) -> Result<u32, ConfigError> {
    match optional_trimmed_env(key) {
        Some(raw) => raw.parse::<u32>().map_err(|_| ConfigError::ParseNumber {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

pub(crate) fn parse_u64_env(key: &str, default: u64) -> Result<u64, ConfigError> {
    match optional_trimmed_env(key) {
        Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::ParseNumber {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

pub(crate) fn parse_usize_env(key: &str, default: usize) -> Result<usize, ConfigError> {
    match optional_trimmed_env(key) {
        Some(raw) => raw.parse::<usize>().map_err(|_| ConfigError::ParseNumber {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

pub(crate) fn parse_f32_env(key: &str, default: f32) -> Result<f32, ConfigError> {
    match optional_trimmed_env(key) {
        Some(raw) => match raw.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ConfigError::ParseNumber {
                key: key.to_string(),
                value: raw,
            }),
        },
        None => Ok(default),
    }
}

pub(crate) fn optional_trimmed_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
