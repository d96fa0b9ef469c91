use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

use crate::series::{DEFAULT_FORECAST_PERIODS, DEFAULT_HISTORICAL_PERIODS};

pub const PORTFOLIO_DATA_PATH: &str = "PORTFOLIO_DATA_PATH";
pub const PORTFOLIO_OUTPUT_DIR: &str = "PORTFOLIO_OUTPUT_DIR";
pub const PORTFOLIO_HISTORY_PERIODS: &str = "PORTFOLIO_HISTORY_PERIODS";
pub const PORTFOLIO_FORECAST: &str = "PORTFOLIO_FORECAST";
pub const PORTFOLIO_PREVIEW_ROWS: &str = "PORTFOLIO_PREVIEW_ROWS";

const MAX_HISTORY_PERIODS: usize = 24;
const MAX_PREVIEW_ROWS: usize = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid number for {0}: {1}")]
    InvalidNumber(&'static str, ParseIntError),
    #[error("{name} must be between 1 and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: usize,
        max: usize,
    },
    #[error("Invalid boolean for {0}: {1}")]
    InvalidBool(&'static str, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub historical_periods: usize,
    pub forecast_periods: usize,
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("projects.json"),
            output_dir: PathBuf::from("."),
            historical_periods: DEFAULT_HISTORICAL_PERIODS,
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            preview_rows: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let data_path = env::var(PORTFOLIO_DATA_PATH)
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let output_dir = env::var(PORTFOLIO_OUTPUT_DIR)
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let historical_periods = bounded_var(
            PORTFOLIO_HISTORY_PERIODS,
            defaults.historical_periods,
            MAX_HISTORY_PERIODS,
        )?;

        let forecast = match env::var(PORTFOLIO_FORECAST) {
            Ok(raw) => parse_bool(PORTFOLIO_FORECAST, &raw)?,
            Err(_) => true,
        };
        let forecast_periods = if forecast { DEFAULT_FORECAST_PERIODS } else { 0 };

        let preview_rows =
            bounded_var(PORTFOLIO_PREVIEW_ROWS, defaults.preview_rows, MAX_PREVIEW_ROWS)?;

        Ok(Config {
            data_path,
            output_dir,
            historical_periods,
            forecast_periods,
            preview_rows,
        })
    }
}

fn bounded_var(name: &'static str, default: usize, max: usize) -> Result<usize, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidNumber(name, e))?;
    if value == 0 || value > max {
        return Err(ConfigError::OutOfRange { name, value, max });
    }
    Ok(value)
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool(name, raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests in this module mutate process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for name in [
            PORTFOLIO_DATA_PATH,
            PORTFOLIO_OUTPUT_DIR,
            PORTFOLIO_HISTORY_PERIODS,
            PORTFOLIO_FORECAST,
            PORTFOLIO_PREVIEW_ROWS,
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.historical_periods, 6);
        assert_eq!(config.forecast_periods, 2);
    }

    #[test]
    fn test_config_from_env_with_custom_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var(PORTFOLIO_DATA_PATH, "data/projects.csv");
        env::set_var(PORTFOLIO_HISTORY_PERIODS, "12");
        env::set_var(PORTFOLIO_FORECAST, "off");

        let config = Config::from_env().unwrap();

        assert_eq!(config.data_path, PathBuf::from("data/projects.csv"));
        assert_eq!(config.historical_periods, 12);
        assert_eq!(config.forecast_periods, 0);

        clear_env();
    }

    #[test]
    fn test_config_invalid_history_periods() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var(PORTFOLIO_HISTORY_PERIODS, "six");

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidNumber(_, _))));

        env::set_var(PORTFOLIO_HISTORY_PERIODS, "0");
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::OutOfRange { value: 0, .. })));

        clear_env();
    }

    #[test]
    fn test_config_invalid_forecast_flag() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var(PORTFOLIO_FORECAST, "maybe");

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidBool(_, _))));

        clear_env();
    }
}
