use crate::ratio::{percent_change, percent_of, position_value, total_market_value};
use crate::report::DegenerateInput;
use core_types::Holding;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the per-holding performance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub ticker: String,
    pub since_inception_pct: Option<Decimal>,
    pub week_over_week_pct: Option<Decimal>,
    /// Share of the holdings' total market value, in percent.
    pub percent_of_portfolio: Decimal,
}

/// Builds the performance table, largest position first.
///
/// Holdings with equal weight keep their input order.
pub fn performance_table(holdings: &[Holding]) -> Vec<PerformanceRow> {
    let total = match total_market_value(holdings) {
        Some(total) if total > Decimal::ZERO => Some(total),
        Some(_) if !holdings.is_empty() => {
            tracing::warn!(warning = %DegenerateInput::ZeroMarketValue, "Performance table weights reported as 0.");
            None
        }
        Some(_) => None,
        None => {
            tracing::warn!(warning = %DegenerateInput::ValueOverflow, "Performance table weights reported as 0.");
            None
        }
    };

    let mut rows: Vec<PerformanceRow> = holdings
        .iter()
        .map(|h| PerformanceRow {
            ticker: h.ticker.clone(),
            since_inception_pct: percent_change(h.purchase_price, h.current_price),
            week_over_week_pct: h
                .price_last_week
                .and_then(|last_week| percent_change(last_week, h.current_price)),
            percent_of_portfolio: total
                .and_then(|total| percent_of(position_value(h)?, total))
                .unwrap_or(Decimal::ZERO),
        })
        .collect();

    // `sort_by` is stable, which gives the input-order tie-break.
    rows.sort_by(|a, b| b.percent_of_portfolio.cmp(&a.percent_of_portfolio));
    rows
}
