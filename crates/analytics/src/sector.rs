use crate::report::{DegenerateInput, record};
use crate::ratio::{percent_of, position_value};
use core_types::{Holding, Sector};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sector's slice of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorWeight {
    pub sector: Sector,
    pub market_value: Decimal,
    pub weight_pct: Decimal,
}

/// Sector allocation of a set of holdings.
///
/// `weights` is in first-seen order; ordering for display is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorWeights {
    pub weights: Vec<SectorWeight>,
    pub total_market_value: Decimal,
    /// Set when the total market value is not positive and every weight is 0.
    pub degenerate: Option<DegenerateInput>,
}

impl SectorWeights {
    pub fn get(&self, sector: Sector) -> Option<Decimal> {
        self.weights
            .iter()
            .find(|w| w.sector == sector)
            .map(|w| w.weight_pct)
    }

    /// The weights ordered largest first, ties kept in first-seen order.
    pub fn sorted_by_weight(&self) -> Vec<SectorWeight> {
        let mut sorted = self.weights.clone();
        sorted.sort_by(|a, b| b.weight_pct.cmp(&a.weight_pct));
        sorted
    }
}

/// Groups holdings by sector and reports each sector's share of total market value.
pub fn sector_weights(holdings: &[Holding]) -> SectorWeights {
    let mut warnings = Vec::new();
    let (groups, total) = match group_by_sector(holdings) {
        Some(grouped) => grouped,
        None => {
            record(&mut warnings, DegenerateInput::ValueOverflow);
            let mut sectors: Vec<(Sector, Decimal)> = Vec::new();
            for holding in holdings {
                if !sectors.iter().any(|(sector, _)| *sector == holding.sector) {
                    sectors.push((holding.sector, Decimal::ZERO));
                }
            }
            (sectors, Decimal::ZERO)
        }
    };

    let positive = total > Decimal::ZERO;
    if !positive && warnings.is_empty() {
        record(&mut warnings, DegenerateInput::ZeroMarketValue);
    }

    let weights = groups
        .into_iter()
        .map(|(sector, market_value)| SectorWeight {
            sector,
            market_value,
            weight_pct: if positive {
                percent_of(market_value, total).unwrap_or(Decimal::ZERO)
            } else {
                Decimal::ZERO
            },
        })
        .collect();

    SectorWeights {
        weights,
        total_market_value: total,
        degenerate: warnings.pop(),
    }
}

/// Per-sector market values in first-seen order, plus the total. `None` on overflow.
fn group_by_sector(holdings: &[Holding]) -> Option<(Vec<(Sector, Decimal)>, Decimal)> {
    let mut groups: Vec<(Sector, Decimal)> = Vec::new();
    let mut total = Decimal::ZERO;

    for holding in holdings {
        let value = position_value(holding)?;
        total = total.checked_add(value)?;
        match groups.iter_mut().find(|(sector, _)| *sector == holding.sector) {
            Some((_, sum)) => *sum = sum.checked_add(value)?,
            None => groups.push((holding.sector, value)),
        }
    }
    Some((groups, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_single_holding_is_whole_portfolio() {
        let holdings = vec![Holding::new("AAPL", dec!(100), dec!(150), dec!(175.5)).with_sector("Technology")];
        let result = sector_weights(&holdings);
        assert_eq!(result.weights.len(), 1);
        assert_eq!(result.get(Sector::Technology), Some(dec!(100)));
        assert!(result.degenerate.is_none());
    }

    #[test]
    fn test_groups_by_sector_in_first_seen_order() {
        let holdings = vec![
            Holding::new("JPM", dec!(10), dec!(1), dec!(30)).with_sector("Financial Services"),
            Holding::new("AAPL", dec!(10), dec!(1), dec!(50)).with_sector("Technology"),
            Holding::new("V", dec!(10), dec!(1), dec!(20)).with_sector("Financials"),
        ];
        let result = sector_weights(&holdings);
        let sectors: Vec<Sector> = result.weights.iter().map(|w| w.sector).collect();
        assert_eq!(sectors, vec![Sector::Financials, Sector::Technology]);
        assert_eq!(result.get(Sector::Financials), Some(dec!(50)));
        assert_eq!(result.get(Sector::Technology), Some(dec!(50)));
    }

    #[test]
    fn test_unrecognized_sector_folds_into_other() {
        let holdings = vec![
            Holding::new("BTC", dec!(1), dec!(1), dec!(25)).with_sector("Crypto"),
            Holding::new("XYZ", dec!(1), dec!(1), dec!(75)),
        ];
        let result = sector_weights(&holdings);
        assert_eq!(result.weights.len(), 1);
        assert_eq!(result.get(Sector::Other), Some(dec!(100)));
    }

    #[test]
    fn test_zero_total_reports_zero_weights() {
        let holdings = vec![Holding::new("SOLD", dec!(0), dec!(10), dec!(12)).with_sector("Energy")];
        let result = sector_weights(&holdings);
        assert_eq!(result.get(Sector::Energy), Some(Decimal::ZERO));
        assert_eq!(result.degenerate, Some(DegenerateInput::ZeroMarketValue));

        let empty = sector_weights(&[]);
        assert!(empty.weights.is_empty());
        assert_eq!(empty.degenerate, Some(DegenerateInput::ZeroMarketValue));
    }

    #[test]
    fn test_sorted_by_weight_is_descending() {
        let holdings = vec![
            Holding::new("A", dec!(1), dec!(1), dec!(10)).with_sector("Utilities"),
            Holding::new("B", dec!(1), dec!(1), dec!(60)).with_sector("Healthcare"),
            Holding::new("C", dec!(1), dec!(1), dec!(30)).with_sector("Materials"),
        ];
        let sorted = sector_weights(&holdings).sorted_by_weight();
        let sectors: Vec<Sector> = sorted.iter().map(|w| w.sector).collect();
        assert_eq!(sectors, vec![Sector::Healthcare, Sector::Materials, Sector::Utilities]);
    }

    #[test]
    fn test_overflowing_total_reports_zero_weights() {
        let half = dec!(50000000000000000000000000000);
        let holdings = vec![
            Holding::new("A", half, dec!(1), dec!(1)).with_sector("Energy"),
            Holding::new("B", half, dec!(1), dec!(1)).with_sector("Utilities"),
        ];
        let result = sector_weights(&holdings);
        assert_eq!(result.degenerate, Some(DegenerateInput::ValueOverflow));
        assert_eq!(result.weights.len(), 2);
        assert_eq!(result.get(Sector::Energy), Some(Decimal::ZERO));
        assert_eq!(result.get(Sector::Utilities), Some(Decimal::ZERO));
    }
}
