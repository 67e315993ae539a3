use core_types::Holding;
use rust_decimal::Decimal;

/// `part / whole * 100`, or `None` when `whole` is zero or the result does not fit.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Percent change from `from` to `to`, or `None` when `from` is zero.
pub(crate) fn percent_change(from: Decimal, to: Decimal) -> Option<Decimal> {
    percent_of(to.checked_sub(from)?, from)
}

/// `shares × current_price`, or `None` when the product does not fit.
pub(crate) fn position_value(holding: &Holding) -> Option<Decimal> {
    holding.shares.checked_mul(holding.current_price)
}

/// Sum of position values, or `None` on overflow.
pub(crate) fn total_market_value(holdings: &[Holding]) -> Option<Decimal> {
    holdings
        .iter()
        .try_fold(Decimal::ZERO, |acc, h| acc.checked_add(position_value(h)?))
}
