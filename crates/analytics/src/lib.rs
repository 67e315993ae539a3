//! # SMIF Analytics Engine
//!
//! This crate turns a portfolio snapshot into the derived metrics shown on the
//! dashboard: per-holding gain/loss and weights, portfolio aggregates, sector
//! allocation, the performance table, growth series and the sorted ledger.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function takes an immutable snapshot and returns
//!   a fresh result. Nothing is cached, and the same input always gives the same output.
//! - **No Formatting:** Values are raw `Decimal`s. Currency symbols, percent signs and
//!   "N/A" are the presentation layer's business.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: computes the full `PortfolioMetrics` for a snapshot.
//! - `sector_weights`, `performance_table`, `weighted_average`, `growth_series`,
//!   `growth_of_principal`, `transaction_ledger_sort`: finer-grained views.
//! - `AnalyticsError`: returned for structurally invalid input.
//! - `DegenerateInput`: warnings for undefined ratios that were resolved locally.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod growth;
pub mod ledger;
pub mod performance;
mod ratio;
pub mod report;
pub mod sector;
pub mod weighting;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use growth::{GrowthOfPrincipal, GrowthRow, GrowthSeries, growth_of_principal, growth_series};
pub use ledger::{parse_ledger_date, realized_pl_total, transaction_ledger_sort};
pub use performance::{PerformanceRow, performance_table};
pub use report::{Baseline, DegenerateInput, HoldingMetrics, PortfolioMetrics, ReferencePrice, Track};
pub use sector::{SectorWeight, SectorWeights, sector_weights};
pub use weighting::{Fundamental, weighted_average, weighted_fundamental};
