//! Terminal rendering for the dashboard views.
//!
//! The analytics crate returns raw numbers; every currency symbol, percent
//! sign, "N/A" and colour is decided here.

use analytics::{
    DegenerateInput, GrowthOfPrincipal, GrowthSeries, PerformanceRow, PortfolioMetrics,
    SectorWeights,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use configuration::PortfolioBook;
use core_types::{Holding, Portfolio, Transaction};
use rust_decimal::Decimal;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Formats a dollar amount with thousands separators, e.g. `-$1,234.50`.
pub fn money(value: Decimal) -> String {
    let rounded = format!("{:.2}", value.round_dp(2).abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.round_dp(2).is_sign_negative() && !value.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, frac)
}

pub fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v.round_dp(2)),
        None => "N/A".to_string(),
    }
}

fn ratio(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}", v.round_dp(2)),
        None => "N/A".to_string(),
    }
}

/// A right-aligned cell coloured green for gains and red for losses.
fn signed_cell(text: String, value: Option<Decimal>) -> Cell {
    let cell = Cell::new(text).set_alignment(CellAlignment::Right);
    match value {
        Some(v) if v.is_sign_negative() && !v.is_zero() => cell.fg(Color::Red),
        Some(_) => cell.fg(Color::Green),
        None => cell,
    }
}

fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn market_cap(value: Option<Decimal>) -> String {
    match value {
        Some(v) if !v.is_zero() => format!("${:.2}M", (v / Decimal::from(1_000_000)).round_dp(2)),
        _ => "N/A".to_string(),
    }
}

pub fn render_list(book: &PortfolioBook) -> String {
    let mut table = new_table(vec!["Id", "Name", "Description", "Holdings", "Transactions"]);
    for p in &book.portfolios {
        table.add_row(vec![
            Cell::new(&p.id),
            Cell::new(&p.name),
            Cell::new(&p.description),
            number_cell(p.holdings.len().to_string()),
            number_cell(p.transactions.len().to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_overview(portfolio: &Portfolio, metrics: &PortfolioMetrics) -> String {
    let mut summary = new_table(vec!["Metric", "Value"]);
    summary.add_row(vec![Cell::new("Portfolio Value"), number_cell(money(metrics.portfolio_value))]);
    summary.add_row(vec![Cell::new("Total Equities"), number_cell(money(metrics.total_equities))]);
    summary.add_row(vec![Cell::new("Total Cash"), number_cell(money(metrics.total_cash))]);
    summary.add_row(vec![
        Cell::new("Unrealized Gain/Loss"),
        signed_cell(money(metrics.total_gain_loss), Some(metrics.total_gain_loss)),
    ]);
    summary.add_row(vec![
        Cell::new("Total Return %"),
        signed_cell(percent(metrics.total_return_pct), metrics.total_return_pct),
    ]);
    summary.add_row(vec![
        Cell::new("YTD %"),
        signed_cell(percent(metrics.year_to_date_pct), metrics.year_to_date_pct),
    ]);
    summary.add_row(vec![
        Cell::new("Week over Week %"),
        signed_cell(percent(metrics.week_over_week_pct), metrics.week_over_week_pct),
    ]);
    summary.add_row(vec![
        Cell::new("Annualized Return"),
        signed_cell(percent(metrics.annualized_return), metrics.annualized_return),
    ]);
    summary.add_row(vec![
        Cell::new("Realized P/L"),
        signed_cell(money(metrics.realized_pl), Some(metrics.realized_pl)),
    ]);
    summary.add_row(vec![
        Cell::new("Est. Annual Income"),
        number_cell(money(metrics.estimated_annual_income)),
    ]);
    summary.add_row(vec![Cell::new("Weighted Avg P/E"), number_cell(ratio(Some(metrics.weighted_pe)))]);
    summary.add_row(vec![Cell::new("Weighted Avg Beta"), number_cell(ratio(Some(metrics.weighted_beta)))]);

    let mut holdings = new_table(vec![
        "Ticker",
        "Company",
        "Sector",
        "Shares",
        "Price",
        "Market Value",
        "Cost Basis",
        "Gain/Loss",
        "Gain/Loss %",
        "Inception",
        "YTD",
        "W/W",
        "% of Account",
        "Est. Yield",
        "Est. Income",
        "Market Cap",
        "P/E",
        "Beta",
    ]);
    for (holding, m) in portfolio.holdings.iter().zip(&metrics.holdings) {
        holdings.add_row(holding_row(holding, m));
    }

    let mut out = format!("{}\n{}\n\n{}\n\n{}", portfolio.name, portfolio.description, summary, holdings);
    out.push_str(&render_warnings(&metrics.warnings));
    out
}

fn holding_row(holding: &Holding, m: &analytics::HoldingMetrics) -> Vec<Cell> {
    vec![
        Cell::new(&holding.ticker),
        Cell::new(&holding.company_name),
        Cell::new(holding.sector.label()),
        number_cell(holding.shares.normalize().to_string()),
        number_cell(money(holding.current_price)),
        number_cell(money(m.market_value)),
        number_cell(money(m.cost_basis)),
        signed_cell(money(m.gain_loss), Some(m.gain_loss)),
        signed_cell(percent(m.gain_loss_pct), m.gain_loss_pct),
        signed_cell(percent(m.since_inception_pct), m.since_inception_pct),
        signed_cell(percent(m.year_to_date_pct), m.year_to_date_pct),
        signed_cell(percent(m.week_over_week_pct), m.week_over_week_pct),
        number_cell(percent(Some(m.percent_of_account))),
        number_cell(percent(holding.estimated_yield)),
        number_cell(money(m.estimated_annual_income)),
        number_cell(market_cap(holding.market_cap)),
        number_cell(ratio(holding.meaningful_pe())),
        number_cell(ratio(holding.beta)),
    ]
}

pub fn render_analytics(sectors: &SectorWeights, performance: &[PerformanceRow]) -> String {
    let mut sector_table = new_table(vec!["Sector", "Market Value", "Weight"]);
    for w in sectors.sorted_by_weight() {
        sector_table.add_row(vec![
            Cell::new(w.sector.label()),
            number_cell(money(w.market_value)),
            number_cell(percent(Some(w.weight_pct))),
        ]);
    }

    let mut perf_table = new_table(vec!["Ticker", "Since Inception", "Week over Week", "% of Portfolio"]);
    for row in performance {
        perf_table.add_row(vec![
            Cell::new(&row.ticker),
            signed_cell(percent(row.since_inception_pct), row.since_inception_pct),
            signed_cell(percent(row.week_over_week_pct), row.week_over_week_pct),
            number_cell(percent(Some(row.percent_of_portfolio))),
        ]);
    }

    let mut out = format!("Sector Weights\n{}\n\nStock Performance\n{}", sector_table, perf_table);
    if let Some(warning) = &sectors.degenerate {
        out.push_str(&render_warnings(std::slice::from_ref(warning)));
    }
    out
}

pub fn render_performance(series: &GrowthSeries, grown: &[GrowthOfPrincipal], principal: Decimal) -> String {
    let mut growth = new_table(vec![
        "Month",
        "SMIF ($)",
        "SMIF %",
        "SMIF (m/m)",
        "SMIF (cum.)",
        "S&P ($)",
        "S&P %",
        "S&P (m/m)",
        "S&P (cum.)",
    ]);
    for row in &series.rows {
        growth.add_row(vec![
            Cell::new(&row.month),
            number_cell(money(row.smif)),
            number_cell(percent(Some(row.smif_pct_of_start))),
            signed_cell(percent(Some(row.smif_mom_pct)), Some(row.smif_mom_pct)),
            signed_cell(percent(Some(row.smif_cum_pct)), Some(row.smif_cum_pct)),
            number_cell(money(row.benchmark)),
            number_cell(percent(Some(row.benchmark_pct_of_start))),
            signed_cell(percent(Some(row.benchmark_mom_pct)), Some(row.benchmark_mom_pct)),
            signed_cell(percent(Some(row.benchmark_cum_pct)), Some(row.benchmark_cum_pct)),
        ]);
    }

    let mut hypothetical = new_table(vec!["Month", "SMIF ($)", "S&P ($)"]);
    for row in grown {
        hypothetical.add_row(vec![
            Cell::new(&row.month),
            number_cell(money(row.smif)),
            number_cell(money(row.benchmark)),
        ]);
    }

    let mut out = format!(
        "Month-over-Month and Cumulative Growth\n{}\n\nHypothetical Growth of {}\n{}",
        growth,
        money(principal),
        hypothetical
    );
    out.push_str(&render_warnings(&series.degenerate));
    out
}

pub fn render_ledger(transactions: &[Transaction]) -> String {
    let mut table = new_table(vec!["Date", "Action", "Ticker", "Amount", "Realized P/L"]);
    for tx in transactions {
        table.add_row(vec![
            Cell::new(&tx.date),
            Cell::new(&tx.action),
            Cell::new(tx.ticker.as_deref().unwrap_or("")),
            number_cell(money(tx.amount)),
            match tx.realized_pl {
                Some(pl) => signed_cell(money(pl), Some(pl)),
                None => Cell::new(""),
            },
        ]);
    }
    table.to_string()
}

fn render_warnings(warnings: &[DegenerateInput]) -> String {
    warnings
        .iter()
        .map(|w| format!("\nnote: {}", w))
        .collect()
}
