use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Portfolio failed validation: {0}")]
    Validation(#[from] CoreError),
}
