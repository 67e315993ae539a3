//! # SMIF Core Types
//!
//! The shared data model for the portfolio dashboard: holdings, transactions,
//! monthly performance samples and the portfolio snapshot that bundles them.
//!
//! As a Layer 0 crate it has no knowledge of how metrics are derived. It only
//! knows what a structurally valid snapshot looks like.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Sector;
pub use error::CoreError;
pub use structs::{Baselines, Holding, MonthlySample, Portfolio, Transaction};
