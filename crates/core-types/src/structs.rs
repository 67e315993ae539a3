use crate::enums::Sector;
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One ticker's position within a portfolio.
///
/// A `Holding` is an immutable input snapshot. Derived figures such as market
/// value or gain/loss are never stored here; the analytics engine recomputes
/// them on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub sector: Sector,
    pub shares: Decimal,
    /// Cost basis per share.
    pub purchase_price: Decimal,
    pub current_price: Decimal,
    #[serde(default)]
    pub price_last_week: Option<Decimal>,
    #[serde(default)]
    pub price_jan1: Option<Decimal>,
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    /// A value of zero means the ratio is not meaningful (e.g. negative earnings).
    #[serde(default)]
    pub price_to_earnings: Option<Decimal>,
    #[serde(default)]
    pub beta: Option<Decimal>,
    /// Estimated dividend yield, in percent.
    #[serde(default)]
    pub estimated_yield: Option<Decimal>,
}

impl Holding {
    /// Creates a holding with only the required position fields populated.
    pub fn new(
        ticker: impl Into<String>,
        shares: Decimal,
        purchase_price: Decimal,
        current_price: Decimal,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            company_name: String::new(),
            sector: Sector::Other,
            shares,
            purchase_price,
            current_price,
            price_last_week: None,
            price_jan1: None,
            market_cap: None,
            price_to_earnings: None,
            beta: None,
            estimated_yield: None,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<Sector>) -> Self {
        self.sector = sector.into();
        self
    }

    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = name.into();
        self
    }

    pub fn with_reference_prices(
        mut self,
        price_last_week: Option<Decimal>,
        price_jan1: Option<Decimal>,
    ) -> Self {
        self.price_last_week = price_last_week;
        self.price_jan1 = price_jan1;
        self
    }

    pub fn with_fundamentals(
        mut self,
        price_to_earnings: Option<Decimal>,
        beta: Option<Decimal>,
        estimated_yield: Option<Decimal>,
    ) -> Self {
        self.price_to_earnings = price_to_earnings;
        self.beta = beta;
        self.estimated_yield = estimated_yield;
        self
    }

    /// The P/E ratio, or `None` when it is absent or flagged as not meaningful.
    pub fn meaningful_pe(&self) -> Option<Decimal> {
        self.price_to_earnings.filter(|pe| !pe.is_zero())
    }

    /// Checks the structural invariants of a single holding.
    ///
    /// Zero prices are accepted here; the engine reports the affected ratios as
    /// unavailable instead of failing the whole computation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ticker.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "ticker".to_string(),
                "ticker must not be empty".to_string(),
            ));
        }
        if self.shares < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                format!("{}.shares", self.ticker),
                format!("shares must not be negative, got {}", self.shares),
            ));
        }

        let prices = [
            ("purchase_price", Some(self.purchase_price)),
            ("current_price", Some(self.current_price)),
            ("price_last_week", self.price_last_week),
            ("price_jan1", self.price_jan1),
            ("market_cap", self.market_cap),
            ("estimated_yield", self.estimated_yield),
        ];
        for (field, value) in prices {
            if let Some(v) = value {
                if v < Decimal::ZERO {
                    return Err(CoreError::InvalidInput(
                        format!("{}.{}", self.ticker, field),
                        format!("value must not be negative, got {}", v),
                    ));
                }
            }
        }

        // Every position value the engine derives must fit in a Decimal.
        let positions = [
            ("purchase_price", Some(self.purchase_price)),
            ("current_price", Some(self.current_price)),
            ("price_last_week", self.price_last_week),
            ("price_jan1", self.price_jan1),
        ];
        for (field, price) in positions {
            if let Some(p) = price {
                if self.shares.checked_mul(p).is_none() {
                    return Err(out_of_range(format!("{}.{}", self.ticker, field)));
                }
            }
        }
        if let Some(y) = self.estimated_yield {
            let income = self
                .shares
                .checked_mul(self.current_price)
                .and_then(|value| value.checked_mul(y));
            if income.is_none() {
                return Err(out_of_range(format!("{}.estimated_yield", self.ticker)));
            }
        }

        Ok(())
    }
}

fn out_of_range(field: String) -> CoreError {
    CoreError::InvalidInput(field, "value is too large to compute with".to_string())
}

/// A single entry in a portfolio's transaction ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<String>,
    /// Raw ledger date, "M/D/YYYY" or "M/D/YY".
    #[serde(default)]
    pub date: String,
    pub action: String,
    #[serde(default)]
    pub ticker: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub realized_pl: Option<Decimal>,
}

impl Transaction {
    pub fn new(date: impl Into<String>, action: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: None,
            date: date.into(),
            action: action.into(),
            ticker: None,
            amount,
            realized_pl: None,
        }
    }
}

/// Historical reference values that return percentages are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Baselines {
    /// Fund value at inception.
    pub inception_value: Decimal,
    /// Fund value at the start of the current calendar year.
    pub year_start_value: Decimal,
}

impl Default for Baselines {
    fn default() -> Self {
        Self {
            inception_value: Decimal::new(100_000, 0),
            year_start_value: Decimal::new(11_353_199, 2),
        }
    }
}

/// One month of fund value alongside its benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySample {
    pub month: String,
    pub smif: Decimal,
    #[serde(alias = "spy")]
    pub benchmark: Decimal,
}

impl MonthlySample {
    pub fn new(month: impl Into<String>, smif: Decimal, benchmark: Decimal) -> Self {
        Self {
            month: month.into(),
            smif,
            benchmark,
        }
    }
}

/// A snapshot of one portfolio as supplied by the data source.
///
/// The optional baselines override the engine-wide defaults for this portfolio
/// only. `annualized_return` is a reported figure and is passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub total_cash: Option<Decimal>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub monthly_performance: Vec<MonthlySample>,
    #[serde(default)]
    pub inception_value: Option<Decimal>,
    #[serde(default)]
    pub year_start_value: Option<Decimal>,
    #[serde(default)]
    pub annualized_return: Option<Decimal>,
}

impl Portfolio {
    pub fn new(id: impl Into<String>, holdings: Vec<Holding>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            holdings,
            total_cash: None,
            transactions: Vec::new(),
            monthly_performance: Vec::new(),
            inception_value: None,
            year_start_value: None,
            annualized_return: None,
        }
    }

    pub fn with_cash(mut self, cash: Decimal) -> Self {
        self.total_cash = Some(cash);
        self
    }

    /// Resolves the baselines for this portfolio, preferring its own overrides.
    pub fn baselines(&self, defaults: Baselines) -> Baselines {
        Baselines {
            inception_value: self.inception_value.unwrap_or(defaults.inception_value),
            year_start_value: self.year_start_value.unwrap_or(defaults.year_start_value),
        }
    }

    /// Cash balance, treating an absent value as zero.
    pub fn cash(&self) -> Decimal {
        self.total_cash.unwrap_or(Decimal::ZERO)
    }

    /// Validates every holding, the uniqueness of tickers, and that the portfolio totals fit in a `Decimal`.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(self.holdings.len());
        for holding in &self.holdings {
            holding.validate()?;
            if !seen.insert(holding.ticker.as_str()) {
                return Err(CoreError::InvalidInput(
                    format!("{}.holdings", self.id),
                    format!("duplicate ticker '{}'", holding.ticker),
                ));
            }
        }

        // Each product fits once the holdings are valid; the portfolio totals must fit too.
        let equities = self.total(|h| h.shares * h.current_price);
        let totals = [
            ("market_value", equities.and_then(|e| e.checked_add(self.cash()))),
            ("cost_basis", self.total(|h| h.shares * h.purchase_price)),
            (
                "last_week_value",
                self.total(|h| h.shares * h.price_last_week.unwrap_or(Decimal::ZERO)),
            ),
            (
                "estimated_income",
                self.total(|h| h.shares * h.current_price * h.estimated_yield.unwrap_or(Decimal::ZERO)),
            ),
        ];
        let realized = self
            .transactions
            .iter()
            .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.realized_pl.unwrap_or(Decimal::ZERO)));
        if realized.is_none() {
            return Err(out_of_range(format!("{}.realized_pl", self.id)));
        }
        for (field, total) in totals {
            if total.is_none() {
                return Err(out_of_range(format!("{}.{}", self.id, field)));
            }
        }
        Ok(())
    }

    fn total<F>(&self, value: F) -> Option<Decimal>
    where
        F: Fn(&Holding) -> Decimal,
    {
        self.holdings
            .iter()
            .try_fold(Decimal::ZERO, |acc, h| acc.checked_add(value(h)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_holding_passes() {
        let holding = Holding::new("AAPL", dec!(100), dec!(150), dec!(175.5));
        assert!(holding.validate().is_ok());
    }

    #[test]
    fn test_negative_shares_rejected() {
        let holding = Holding::new("AAPL", dec!(-1), dec!(150), dec!(175.5));
        let err = holding.validate().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput(
                "AAPL.shares".to_string(),
                "shares must not be negative, got -1".to_string()
            )
        );
    }

    #[test]
    fn test_zero_prices_are_structurally_valid() {
        let holding = Holding::new("ZERO", dec!(10), dec!(0), dec!(0))
            .with_reference_prices(Some(dec!(0)), None);
        assert!(holding.validate().is_ok());
    }

    #[test]
    fn test_negative_reference_price_rejected() {
        let holding = Holding::new("MSFT", dec!(1), dec!(280), dec!(320))
            .with_reference_prices(None, Some(dec!(-3)));
        assert!(matches!(
            holding.validate(),
            Err(CoreError::InvalidInput(field, _)) if field == "MSFT.price_jan1"
        ));
    }

    #[test]
    fn test_unrepresentable_position_rejected() {
        let holding = Holding::new("BIG", dec!(100000000000000000000), dec!(1), dec!(1000000000));
        assert_eq!(
            holding.validate().unwrap_err(),
            CoreError::InvalidInput(
                "BIG.current_price".to_string(),
                "value is too large to compute with".to_string()
            )
        );

        let income = Holding::new("YLD", dec!(1000000000000000000000000), dec!(1), dec!(1000))
            .with_fundamentals(None, None, Some(dec!(1000)));
        assert!(matches!(
            income.validate(),
            Err(CoreError::InvalidInput(field, _)) if field == "YLD.estimated_yield"
        ));
    }

    #[test]
    fn test_unrepresentable_portfolio_total_rejected() {
        let half = dec!(50000000000000000000000000000);
        let portfolio = Portfolio::new(
            "whale",
            vec![
                Holding::new("A", half, dec!(0), dec!(1)),
                Holding::new("B", half, dec!(0), dec!(1)),
            ],
        );
        assert!(portfolio.holdings.iter().all(|h| h.validate().is_ok()));
        assert!(matches!(
            portfolio.validate(),
            Err(CoreError::InvalidInput(field, _)) if field == "whale.market_value"
        ));
    }

    #[test]
    fn test_empty_ticker_rejected() {
        let holding = Holding::new("  ", dec!(1), dec!(1), dec!(1));
        assert!(holding.validate().is_err());
    }

    #[test]
    fn test_duplicate_tickers_rejected() {
        let portfolio = Portfolio::new(
            "growth",
            vec![
                Holding::new("JPM", dec!(1), dec!(140), dec!(155)),
                Holding::new("JPM", dec!(2), dec!(141), dec!(155)),
            ],
        );
        assert!(matches!(
            portfolio.validate(),
            Err(CoreError::InvalidInput(_, reason)) if reason.contains("JPM")
        ));
    }

    #[test]
    fn test_absent_cash_is_zero() {
        let portfolio = Portfolio::new("empty", Vec::new());
        assert_eq!(portfolio.cash(), Decimal::ZERO);
        assert_eq!(portfolio.with_cash(dec!(250)).cash(), dec!(250));
    }

    #[test]
    fn test_portfolio_baselines_override_defaults() {
        let mut portfolio = Portfolio::new("scholarship", Vec::new());
        portfolio.inception_value = Some(dec!(50000));
        let resolved = portfolio.baselines(Baselines::default());
        assert_eq!(resolved.inception_value, dec!(50000));
        assert_eq!(resolved.year_start_value, dec!(113531.99));
    }

    #[test]
    fn test_meaningful_pe_filters_zero_sentinel() {
        let holding = Holding::new("NVDA", dec!(1), dec!(1), dec!(1))
            .with_fundamentals(Some(dec!(0)), Some(dec!(1.7)), None);
        assert_eq!(holding.meaningful_pe(), None);
    }

    #[test]
    fn test_holding_deserializes_with_defaults() {
        let json = r#"{"ticker":"PG","shares":45,"purchase_price":"145.00","current_price":152.75}"#;
        let holding: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(holding.sector, Sector::Other);
        assert_eq!(holding.current_price, dec!(152.75));
        assert!(holding.price_last_week.is_none());
    }
}
