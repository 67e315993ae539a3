use std::path::Path;

// Declare the modules that make up this crate.
pub mod data;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use data::{PortfolioBook, load_portfolio_book};
pub use error::ConfigError;
pub use settings::{Config, DataSource, Logging};

/// Prefix for environment variables that override file settings,
/// e.g. `SMIF__BASELINES__INCEPTION_VALUE=100000`.
pub const ENV_PREFIX: &str = "SMIF";

/// Loads the application configuration from the given `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// layers `SMIF__*` environment variables on top, deserializes the result into our
/// strongly-typed `Config` struct and validates it.
///
/// A relative `data.portfolios_file` is resolved against the directory of the config file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_env(path, ENV_PREFIX)
}

pub(crate) fn load_config_with_env(path: &Path, env_prefix: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix(env_prefix).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let mut config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    if config.data.portfolios_file.is_relative() {
        if let Some(dir) = path.parent() {
            config.data.portfolios_file = dir.join(&config.data.portfolios_file);
        }
    }

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}
