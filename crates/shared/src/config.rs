use std::time::Duration;

use thiserror::Error;

use crate::animation::AnimationSettings;
use crate::config_env::{parse_u64_env, parse_usize_env};

pub const DEFAULT_ANIMATION_TICK_MS: u64 = 100;
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 2_500;
pub const DEFAULT_CANDIDATE_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid number in env var {key}: {value}")]
    ParseNumber { key: String, value: String },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

#[derive(Debug, Clone)]
pub struct PickerConfig {
    pub animation: AnimationSettings,
    /// Leading candidates offered to the model per request.
    pub candidate_limit: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            animation: AnimationSettings {
                tick: Duration::from_millis(DEFAULT_ANIMATION_TICK_MS),
                duration: Duration::from_millis(DEFAULT_ANIMATION_DURATION_MS),
            },
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

impl PickerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            animation: AnimationSettings {
                tick: Duration::from_millis(parse_u64_env(
                    "PICKER_ANIMATION_TICK_MS",
                    DEFAULT_ANIMATION_TICK_MS,
                )?),
                duration: Duration::from_millis(parse_u64_env(
                    "PICKER_ANIMATION_DURATION_MS",
                    DEFAULT_ANIMATION_DURATION_MS,
                )?),
            },
            candidate_limit: parse_usize_env("PICKER_CANDIDATE_LIMIT", DEFAULT_CANDIDATE_LIMIT)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation.tick.is_zero() {
            return Err(ConfigError::InvalidConfiguration(
                "PICKER_ANIMATION_TICK_MS must be greater than zero".to_string(),
            ));
        }
        if self.candidate_limit == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "PICKER_CANDIDATE_LIMIT must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads `.env` from the working directory when one exists.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ConfigError, PickerConfig};

    #[test]
    fn default_config_matches_reveal_timings() {
        let config = PickerConfig::default();
        assert_eq!(config.animation.tick, Duration::from_millis(100));
        assert_eq!(config.animation.duration, Duration::from_millis(2_500));
        assert_eq!(config.candidate_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_tick_and_zero_limit() {
        let mut config = PickerConfig::default();
        config.animation.tick = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfiguration(_))
        ));

        let mut config = PickerConfig::default();
        config.candidate_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }
}
