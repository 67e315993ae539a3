use crate::error::AnalyticsError;
use crate::ledger::realized_pl_total;
use crate::ratio::{percent_change, percent_of};
use crate::report::{
    Baseline, DegenerateInput, HoldingMetrics, PortfolioMetrics, ReferencePrice, record,
};
use crate::weighting::weighted_sum;
use core_types::{Baselines, Holding, Portfolio};
use rust_decimal::Decimal;

/// A stateless calculator for deriving metrics from a portfolio snapshot.
///
/// The only state it carries is the default set of historical baselines,
/// which a portfolio may override with its own.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    baselines: Baselines,
}

impl AnalyticsEngine {
    pub fn new(baselines: Baselines) -> Self {
        Self { baselines }
    }

    pub fn baselines(&self) -> Baselines {
        self.baselines
    }

    /// The main entry point for calculating portfolio metrics.
    ///
    /// # Arguments
    ///
    /// * `portfolio` - The snapshot to analyse. It is never modified.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PortfolioMetrics`, or an `AnalyticsError`
    /// if the snapshot is structurally invalid. Undefined ratios do not fail
    /// the call; they are listed in `PortfolioMetrics::warnings`.
    #[tracing::instrument(name = "compute_metrics", skip(self, portfolio), fields(portfolio = %portfolio.id))]
    pub fn compute_metrics(&self, portfolio: &Portfolio) -> Result<PortfolioMetrics, AnalyticsError> {
        portfolio.validate()?;

        let mut warnings = Vec::new();

        let total_equities: Decimal = portfolio.holdings.iter().map(market_value).sum();
        let total_cash = portfolio.cash();
        let portfolio_value = total_equities + total_cash;
        if portfolio_value <= Decimal::ZERO && !portfolio.holdings.is_empty() {
            record(&mut warnings, DegenerateInput::ZeroPortfolioValue);
        }

        let holdings: Vec<HoldingMetrics> = portfolio
            .holdings
            .iter()
            .map(|h| self.calculate_holding(h, portfolio_value, &mut warnings))
            .collect();

        let mut metrics = PortfolioMetrics {
            portfolio_id: portfolio.id.clone(),
            holdings,
            total_equities,
            total_cash,
            portfolio_value,
            total_cost_basis: Decimal::ZERO,
            total_gain_loss: Decimal::ZERO,
            total_gain_loss_pct: None,
            total_return_pct: None,
            year_to_date_pct: None,
            week_over_week_pct: None,
            annualized_return: portfolio.annualized_return,
            // `validate` has already ruled out overflow.
            realized_pl: realized_pl_total(&portfolio.transactions).unwrap_or_default(),
            weighted_pe: Decimal::ZERO,
            weighted_beta: Decimal::ZERO,
            estimated_annual_income: Decimal::ZERO,
            warnings: Vec::new(),
        };

        self.calculate_returns(portfolio, &mut metrics, &mut warnings);
        self.calculate_fundamentals(portfolio, &mut metrics, &mut warnings);

        tracing::debug!(
            holdings = metrics.holdings.len(),
            portfolio_value = %metrics.portfolio_value,
            warnings = warnings.len(),
            "Portfolio metrics computed."
        );

        metrics.warnings = warnings;
        Ok(metrics)
    }

    /// Calculates the metrics of a single holding against the portfolio total.
    fn calculate_holding(
        &self,
        holding: &Holding,
        portfolio_value: Decimal,
        warnings: &mut Vec<DegenerateInput>,
    ) -> HoldingMetrics {
        let market_value = market_value(holding);
        let cost_basis = holding.shares * holding.purchase_price;
        let gain_loss = market_value - cost_basis;

        let gain_loss_pct = percent_of(gain_loss, cost_basis);
        let since_inception_pct = percent_change(holding.purchase_price, holding.current_price);
        if gain_loss_pct.is_none() || since_inception_pct.is_none() {
            record(
                warnings,
                DegenerateInput::ZeroCostBasis {
                    ticker: holding.ticker.clone(),
                },
            );
        }

        let week_over_week_pct = reference_change(
            holding,
            holding.price_last_week,
            ReferencePrice::LastWeek,
            warnings,
        );
        let year_to_date_pct =
            reference_change(holding, holding.price_jan1, ReferencePrice::YearStart, warnings);

        let percent_of_account = if portfolio_value > Decimal::ZERO {
            percent_of(market_value, portfolio_value).unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        let estimated_annual_income = holding
            .estimated_yield
            .map(|y| market_value * y / Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO);

        HoldingMetrics {
            ticker: holding.ticker.clone(),
            sector: holding.sector,
            market_value,
            cost_basis,
            gain_loss,
            gain_loss_pct,
            since_inception_pct,
            week_over_week_pct,
            year_to_date_pct,
            percent_of_account,
            estimated_annual_income,
        }
    }

    /// Calculates the portfolio-level gain/loss and return percentages.
    fn calculate_returns(
        &self,
        portfolio: &Portfolio,
        metrics: &mut PortfolioMetrics,
        warnings: &mut Vec<DegenerateInput>,
    ) {
        metrics.total_cost_basis = metrics.holdings.iter().map(|h| h.cost_basis).sum();
        metrics.total_gain_loss = metrics.holdings.iter().map(|h| h.gain_loss).sum();
        metrics.total_gain_loss_pct = percent_of(metrics.total_gain_loss, metrics.total_cost_basis);

        let baselines = portfolio.baselines(self.baselines);
        metrics.total_return_pct = baseline_return(
            baselines.inception_value,
            metrics.portfolio_value,
            Baseline::Inception,
            warnings,
        );
        metrics.year_to_date_pct = baseline_return(
            baselines.year_start_value,
            metrics.portfolio_value,
            Baseline::YearStart,
            warnings,
        );

        // Only holdings that report a last-week price take part.
        let (last_week, now) = portfolio
            .holdings
            .iter()
            .filter_map(|h| h.price_last_week.map(|p| (h.shares * p, market_value(h))))
            .fold((Decimal::ZERO, Decimal::ZERO), |(lw, n), (a, b)| (lw + a, n + b));
        metrics.week_over_week_pct = percent_change(last_week, now);
    }

    /// Calculates the weighted fundamentals and income totals.
    ///
    /// Weights are each holding's percent of account, so cash dilutes the averages.
    fn calculate_fundamentals(
        &self,
        portfolio: &Portfolio,
        metrics: &mut PortfolioMetrics,
        warnings: &mut Vec<DegenerateInput>,
    ) {
        let weights: Vec<Decimal> = metrics
            .holdings
            .iter()
            .map(|h| h.percent_of_account / Decimal::ONE_HUNDRED)
            .collect();

        // Negative cash can push weights far past 1, so the fold is checked.
        let mut weighted = |select: fn(&Holding) -> Option<Decimal>| {
            weighted_sum(portfolio.holdings.iter().map(select).zip(weights.iter().copied()))
                .unwrap_or_else(|| {
                    record(warnings, DegenerateInput::ValueOverflow);
                    Decimal::ZERO
                })
        };
        metrics.weighted_pe = weighted(|h| h.price_to_earnings);
        metrics.weighted_beta = weighted(|h| h.beta);

        metrics.estimated_annual_income = metrics
            .holdings
            .iter()
            .map(|h| h.estimated_annual_income)
            .sum();
    }
}

/// Safe once the portfolio has validated: every position value fits.
fn market_value(holding: &Holding) -> Decimal {
    holding.shares * holding.current_price
}

/// Percent change from an optional reference price to the current price.
///
/// An absent reference is simply unavailable; a zero reference is also flagged.
fn reference_change(
    holding: &Holding,
    reference: Option<Decimal>,
    kind: ReferencePrice,
    warnings: &mut Vec<DegenerateInput>,
) -> Option<Decimal> {
    let reference = reference?;
    let change = percent_change(reference, holding.current_price);
    if change.is_none() {
        record(
            warnings,
            DegenerateInput::ZeroReferencePrice {
                ticker: holding.ticker.clone(),
                reference: kind,
            },
        );
    }
    change
}

fn baseline_return(
    baseline_value: Decimal,
    portfolio_value: Decimal,
    baseline: Baseline,
    warnings: &mut Vec<DegenerateInput>,
) -> Option<Decimal> {
    if baseline_value <= Decimal::ZERO {
        record(warnings, DegenerateInput::NonPositiveBaseline { baseline });
        return None;
    }
    percent_change(baseline_value, portfolio_value)
}
