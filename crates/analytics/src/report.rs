use core_types::Sector;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics derived for a single holding.
///
/// Ratios that cannot be computed (zero cost basis, missing reference price)
/// are `None`; the presentation layer decides how to show them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingMetrics {
    pub ticker: String,
    pub sector: Sector,
    pub market_value: Decimal,
    pub cost_basis: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_pct: Option<Decimal>,
    pub since_inception_pct: Option<Decimal>,
    pub week_over_week_pct: Option<Decimal>,
    pub year_to_date_pct: Option<Decimal>,
    /// Share of total portfolio value (equities plus cash), in percent.
    pub percent_of_account: Decimal,
    pub estimated_annual_income: Decimal,
}

/// The complete set of derived metrics for one portfolio snapshot.
///
/// This struct is the output of `AnalyticsEngine::compute_metrics`. It is
/// rebuilt from scratch on every call and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub portfolio_id: String,
    /// Per-holding metrics, in the same order as the input holdings.
    pub holdings: Vec<HoldingMetrics>,

    // I. Value
    pub total_equities: Decimal,
    pub total_cash: Decimal,
    pub portfolio_value: Decimal,
    pub total_cost_basis: Decimal,

    // II. Returns
    pub total_gain_loss: Decimal,
    pub total_gain_loss_pct: Option<Decimal>,
    pub total_return_pct: Option<Decimal>,
    pub year_to_date_pct: Option<Decimal>,
    pub week_over_week_pct: Option<Decimal>,
    pub annualized_return: Option<Decimal>,
    pub realized_pl: Decimal,

    // III. Fundamentals
    pub weighted_pe: Decimal,
    pub weighted_beta: Decimal,
    pub estimated_annual_income: Decimal,

    /// Degenerate inputs that were resolved to safe defaults.
    pub warnings: Vec<DegenerateInput>,
}

impl PortfolioMetrics {
    pub fn holding(&self, ticker: &str) -> Option<&HoldingMetrics> {
        self.holdings.iter().find(|h| h.ticker == ticker)
    }
}

/// Which reference price a week-over-week or YTD figure is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferencePrice {
    LastWeek,
    YearStart,
}

/// Which baseline a portfolio-level return is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Baseline {
    Inception,
    YearStart,
}

/// One of the two value tracks in a growth series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    Fund,
    Benchmark,
}

/// A mathematically undefined ratio that was resolved locally.
///
/// These are not errors: the affected metric is reported as 0 or `None` and
/// the computation carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegenerateInput {
    /// Portfolio value is zero or negative; every percent of account is 0.
    ZeroPortfolioValue,
    /// The holdings have no market value; every weight is 0.
    ZeroMarketValue,
    ZeroCostBasis { ticker: String },
    ZeroReferencePrice { ticker: String, reference: ReferencePrice },
    NonPositiveBaseline { baseline: Baseline },
    ZeroGrowthBase { month: String, track: Track },
    /// An aggregate does not fit in a `Decimal`; it is reported as 0.
    ValueOverflow,
}

impl fmt::Display for DegenerateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateInput::ZeroPortfolioValue => write!(f, "portfolio value is not positive"),
            DegenerateInput::ZeroMarketValue => write!(f, "total market value is not positive"),
            DegenerateInput::ZeroCostBasis { ticker } => {
                write!(f, "{} has a zero cost basis", ticker)
            }
            DegenerateInput::ZeroReferencePrice { ticker, reference } => {
                write!(f, "{} has a zero {:?} reference price", ticker, reference)
            }
            DegenerateInput::NonPositiveBaseline { baseline } => {
                write!(f, "{:?} baseline is not positive", baseline)
            }
            DegenerateInput::ZeroGrowthBase { month, track } => {
                write!(f, "{:?} value is zero at {}", track, month)
            }
            DegenerateInput::ValueOverflow => write!(f, "values are too large to aggregate"),
        }
    }
}

/// Logs a degenerate input and appends it to `warnings`.
pub(crate) fn record(warnings: &mut Vec<DegenerateInput>, warning: DegenerateInput) {
    tracing::warn!(warning = %warning, "Degenerate input resolved to a safe default.");
    warnings.push(warning);
}
