use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::housing::EligibilityConfig;

/// Distinguishes runtime behavior for different stages of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub eligibility: EligibilityConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat(value))?,
            Err(_) => LogFormat::Compact,
        };

        let defaults = EligibilityConfig::default();
        let eligibility = EligibilityConfig {
            single_min_age: age_var("BTO_SINGLE_MIN_AGE", defaults.single_min_age)?,
            married_min_age: age_var("BTO_MARRIED_MIN_AGE", defaults.married_min_age)?,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            eligibility,
            seed: SeedConfig {
                accounts_csv: path_var("BTO_ACCOUNTS_CSV"),
                projects_csv: path_var("BTO_PROJECTS_CSV"),
            },
        })
    }
}

fn age_var(name: &'static str, default: u8) -> Result<u8, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u8>()
            .map_err(|_| ConfigError::InvalidAge { var: name, value }),
        Err(_) => Ok(default),
    }
}

fn path_var(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Optional CSV files used to seed accounts and projects.
#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    pub accounts_csv: Option<PathBuf>,
    pub projects_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidAge { var: &'static str, value: String },
    InvalidLogFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAge { var, value } => {
                write!(f, "{} must be an age between 0 and 255, got '{}'", var, value)
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', got '{}'", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_LOG_FORMAT");
        env::remove_var("BTO_SINGLE_MIN_AGE");
        env::remove_var("BTO_MARRIED_MIN_AGE");
        env::remove_var("BTO_ACCOUNTS_CSV");
        env::remove_var("BTO_PROJECTS_CSV");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.eligibility, EligibilityConfig::default());
        assert!(config.seed.accounts_csv.is_none());
    }

    #[test]
    fn reads_age_thresholds_and_seed_paths() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("APP_LOG_FORMAT", "JSON");
        env::set_var("BTO_SINGLE_MIN_AGE", "40");
        env::set_var("BTO_ACCOUNTS_CSV", "data/accounts.csv");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.eligibility.single_min_age, 40);
        assert_eq!(config.eligibility.married_min_age, 21);
        assert_eq!(
            config.seed.accounts_csv,
            Some(PathBuf::from("data/accounts.csv"))
        );
    }

    #[test]
    fn rejects_non_numeric_age() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BTO_MARRIED_MIN_AGE", "twenty");
        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::InvalidAge { var, value }) => {
                assert_eq!(var, "BTO_MARRIED_MIN_AGE");
                assert_eq!(value, "twenty");
            }
            other => panic!("expected invalid age, got {other:?}"),
        }
    }
}
