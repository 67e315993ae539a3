use crate::error::ConfigError;
use core_types::Portfolio;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Every portfolio snapshot known to the application, as read from the data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioBook {
    #[serde(default)]
    pub portfolios: Vec<Portfolio>,
}

impl PortfolioBook {
    pub fn find(&self, id: &str) -> Option<&Portfolio> {
        self.portfolios.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.portfolios.iter().map(|p| p.id.as_str())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for portfolio in &self.portfolios {
            if portfolio.id.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "every portfolio needs a non-empty id".to_string(),
                ));
            }
            if !seen.insert(portfolio.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate portfolio id '{}'",
                    portfolio.id
                )));
            }
        }
        Ok(())
    }
}

/// Loads the portfolio book from a TOML or JSON file.
///
/// The format is chosen from the file extension. Only the shape of the book is
/// checked here; holding-level validation belongs to the analytics engine.
pub fn load_portfolio_book(path: &Path) -> Result<PortfolioBook, ConfigError> {
    let book = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?
        .try_deserialize::<PortfolioBook>()?;
    book.validate()?;

    tracing::info!(
        portfolios = book.portfolios.len(),
        path = %path.display(),
        "Loaded portfolio book."
    );
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Sector;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    const BOOK: &str = r#"
[[portfolios]]
id = "growth"
name = "Growth Portfolio"
total_cash = 4815.32

[[portfolios.holdings]]
ticker = "AAPL"
company_name = "Apple Inc."
sector = "Technology"
shares = 100
purchase_price = 150.00
current_price = 175.50
price_last_week = 171.22

[[portfolios.holdings]]
ticker = "JPM"
sector = "Financial Services"
shares = 50
purchase_price = 140
current_price = 155.75
price_to_earnings = 0

[[portfolios.transactions]]
date = "1/2/24"
action = "Buy"
ticker = "AAPL"
amount = 15000

[[portfolios.monthly_performance]]
month = "Jan 2024"
smif = 113531.99
spy = 482.88

[[portfolios]]
id = "scholarship"
inception_value = 50000
"#;

    #[test]
    fn test_load_toml_book() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portfolios.toml");
        fs::write(&path, BOOK).unwrap();

        let book = load_portfolio_book(&path).unwrap();
        assert_eq!(book.ids().collect::<Vec<_>>(), vec!["growth", "scholarship"]);

        let growth = book.find("growth").unwrap();
        assert_eq!(growth.total_cash, Some(dec!(4815.32)));
        assert_eq!(growth.holdings.len(), 2);
        assert_eq!(growth.holdings[0].current_price, dec!(175.50));
        assert_eq!(growth.holdings[0].price_last_week, Some(dec!(171.22)));
        assert_eq!(growth.holdings[1].sector, Sector::Financials);
        assert_eq!(growth.holdings[1].price_to_earnings, Some(dec!(0)));
        assert_eq!(growth.transactions[0].date, "1/2/24");
        assert_eq!(growth.monthly_performance[0].benchmark, dec!(482.88));

        let scholarship = book.find("scholarship").unwrap();
        assert!(scholarship.holdings.is_empty());
        assert_eq!(scholarship.inception_value, Some(dec!(50000)));
    }

    #[test]
    fn test_load_json_book() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portfolios.json");
        fs::write(
            &path,
            r#"{"portfolios":[{"id":"growth","holdings":[{"ticker":"V","shares":30,"purchase_price":220,"current_price":235.5}]}]}"#,
        )
        .unwrap();

        let book = load_portfolio_book(&path).unwrap();
        let growth = book.find("growth").unwrap();
        assert_eq!(growth.holdings[0].sector, Sector::Other);
        assert_eq!(growth.total_cash, None);
    }

    #[test]
    fn test_duplicate_portfolio_ids_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dupes.toml");
        fs::write(&path, "[[portfolios]]\nid = \"a\"\n\n[[portfolios]]\nid = \"a\"\n").unwrap();

        assert!(matches!(
            load_portfolio_book(&path),
            Err(ConfigError::ValidationError(msg)) if msg.contains("'a'")
        ));
    }
}
