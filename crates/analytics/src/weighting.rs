use crate::ratio::{position_value, total_market_value};
use crate::report::DegenerateInput;
use core_types::Holding;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The per-holding fundamentals that are commonly averaged across a portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fundamental {
    PriceToEarnings,
    Beta,
    EstimatedYield,
}

impl Fundamental {
    pub fn value(self, holding: &Holding) -> Option<Decimal> {
        match self {
            Fundamental::PriceToEarnings => holding.price_to_earnings,
            Fundamental::Beta => holding.beta,
            Fundamental::EstimatedYield => holding.estimated_yield,
        }
    }
}

/// Market-value-weighted mean of a per-holding value.
///
/// Each holding is weighted by its share of the holdings' total market value.
/// A selector returning `None` contributes nothing, so a missing fundamental
/// drags the average towards zero rather than failing. Returns zero when the
/// holdings have no market value or the sums overflow.
pub fn weighted_average<F>(holdings: &[Holding], selector: F) -> Decimal
where
    F: Fn(&Holding) -> Option<Decimal>,
{
    let total = match total_market_value(holdings) {
        Some(total) if total > Decimal::ZERO => total,
        _ => return Decimal::ZERO,
    };

    weighted_sum(holdings.iter().map(|h| {
        let weight = position_value(h)
            .and_then(|value| value.checked_div(total))
            .unwrap_or(Decimal::ZERO);
        (selector(h), weight)
    }))
    .unwrap_or_else(|| {
        tracing::warn!(warning = %DegenerateInput::ValueOverflow, "Weighted average reported as 0.");
        Decimal::ZERO
    })
}

/// Convenience wrapper over `weighted_average` for a named fundamental.
pub fn weighted_fundamental(holdings: &[Holding], fundamental: Fundamental) -> Decimal {
    weighted_average(holdings, |h| fundamental.value(h))
}

/// Folds `(value, weight)` pairs into `Σ value × weight`, treating absent values as 0.
///
/// Returns `None` if a product or the running sum overflows.
pub(crate) fn weighted_sum<I>(pairs: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Option<Decimal>, Decimal)>,
{
    pairs.into_iter().try_fold(Decimal::ZERO, |acc, (value, weight)| {
        acc.checked_add(value.unwrap_or(Decimal::ZERO).checked_mul(weight)?)
    })
}
