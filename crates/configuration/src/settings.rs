use crate::error::ConfigError;
use core_types::Baselines;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Historical values that total return and YTD are measured against.
    /// Individual portfolios may override them in the data file.
    #[serde(default)]
    pub baselines: Baselines,
    pub data: DataSource,
    #[serde(default)]
    pub logging: Logging,
}

/// Where the portfolio snapshots are read from.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSource {
    /// Path to the portfolio book (TOML or JSON).
    pub portfolios_file: PathBuf,
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// Default filter directive, e.g. "info" or "analytics=debug". `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    "smif.log".to_string()
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}

impl Config {
    /// Checks that the settings are usable before anything is computed with them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baselines.inception_value <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "baselines.inception_value must be greater than 0".to_string(),
            ));
        }
        if self.baselines.year_start_value <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "baselines.year_start_value must be greater than 0".to_string(),
            ));
        }
        if self.data.portfolios_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.portfolios_file must not be empty".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConfigError, load_config, load_config_with_env};
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[baselines]
inception_value = 50000
year_start_value = "61234.56"

[data]
portfolios_file = "data/portfolios.toml"

[logging]
level = "debug"
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.baselines.inception_value, dec!(50000));
        assert_eq!(config.baselines.year_start_value, dec!(61234.56));
        assert_eq!(config.data.portfolios_file, dir.path().join("data/portfolios.toml"));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_defaults_apply_when_sections_missing() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[data]\nportfolios_file = \"book.json\"\n");

        let config = load_config(&path).unwrap();
        assert_eq!(config.baselines.inception_value, dec!(100000));
        assert_eq!(config.baselines.year_start_value, dec!(113531.99));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file_prefix, "smif.log");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[baselines]\nyear_start_value = 61234.56\n\n[data]\nportfolios_file = \"book.toml\"\n",
        );

        // A prefix of its own keeps this from leaking into other tests.
        // SAFETY: no other test reads or writes this variable.
        unsafe {
            std::env::set_var("SMIF_ENV_TEST__BASELINES__YEAR_START_VALUE", "120000.5");
            std::env::set_var("SMIF_ENV_TEST__LOGGING__LEVEL", "warn");
        }
        let config = load_config_with_env(&path, "SMIF_ENV_TEST");
        unsafe {
            std::env::remove_var("SMIF_ENV_TEST__BASELINES__YEAR_START_VALUE");
            std::env::remove_var("SMIF_ENV_TEST__LOGGING__LEVEL");
        }

        let config = config.unwrap();
        assert_eq!(config.baselines.year_start_value, dec!(120000.5));
        assert_eq!(config.baselines.inception_value, dec!(100000));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_non_positive_baseline_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[baselines]\ninception_value = 0\n\n[data]\nportfolios_file = \"book.toml\"\n",
        );

        match load_config(&path) {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("inception_value")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
