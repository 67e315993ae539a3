use thiserror::Error;

/// Errors raised while reading `config.toml` or the portfolio book.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings or portfolio data: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid settings or portfolio data: {0}")]
    ValidationError(String),
}
