use analytics::{
    AnalyticsEngine, growth_of_principal, growth_series, performance_table, sector_weights,
    transaction_ledger_sort,
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use configuration::{Config, PortfolioBook, load_config, load_portfolio_book};
use core_types::Portfolio;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod display;

/// The main entry point for the SMIF portfolio dashboard.
fn main() -> Result<()> {
    // A missing .env file is not an error; it only supplies optional overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _guard = init_tracing(&config)?;

    let book = load_portfolio_book(&config.data.portfolios_file).with_context(|| {
        format!(
            "Failed to load portfolios from {}",
            config.data.portfolios_file.display()
        )
    })?;
    let engine = AnalyticsEngine::new(config.baselines);

    // Execute the appropriate command
    let output = match cli.command {
        Commands::List => handle_list(&book, cli.json)?,
        Commands::Overview(args) => handle_overview(&engine, find(&book, &args.portfolio)?, cli.json)?,
        Commands::Analytics(args) => handle_analytics(find(&book, &args.portfolio)?, cli.json)?,
        Commands::Performance(args) => {
            handle_performance(find(&book, &args.portfolio)?, args.principal, cli.json)?
        }
        Commands::Transactions(args) => handle_transactions(find(&book, &args.portfolio)?, cli.json)?,
    };
    println!("{}", output);

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Holdings, analytics and performance views for the student-managed investment fund.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, short, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Emit raw metrics as JSON instead of formatted tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the portfolios in the data file.
    List,
    /// Portfolio summary and holdings table.
    Overview(PortfolioArgs),
    /// Sector weights and per-stock performance.
    Analytics(PortfolioArgs),
    /// Month-over-month and cumulative growth against the benchmark.
    Performance(PerformanceArgs),
    /// Transaction history, oldest first.
    Transactions(PortfolioArgs),
}

#[derive(Parser)]
struct PortfolioArgs {
    /// The portfolio id (e.g., "growth").
    portfolio: String,
}

#[derive(Parser)]
struct PerformanceArgs {
    /// The portfolio id (e.g., "growth").
    portfolio: String,

    /// Starting amount for the hypothetical growth table.
    #[arg(long, default_value_t = dec!(1000))]
    principal: Decimal,
}

// ==============================================================================
// Setup
// ==============================================================================

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. The returned guard must be held
/// for the life of the program so buffered file logs are flushed.
fn init_tracing(config: &Config) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    match &config.logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &config.logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}

fn find<'a>(book: &'a PortfolioBook, id: &str) -> Result<&'a Portfolio> {
    book.find(id).ok_or_else(|| {
        anyhow!(
            "Portfolio '{}' not found. Available: {}",
            id,
            book.ids().collect::<Vec<_>>().join(", ")
        )
    })
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_list(book: &PortfolioBook, as_json: bool) -> Result<String> {
    if as_json {
        return Ok(serde_json::to_string_pretty(book)?);
    }
    Ok(display::render_list(book))
}

fn handle_overview(engine: &AnalyticsEngine, portfolio: &Portfolio, as_json: bool) -> Result<String> {
    tracing::info!(portfolio = %portfolio.id, "Computing portfolio overview.");
    let metrics = engine.compute_metrics(portfolio)?;

    if as_json {
        return Ok(serde_json::to_string_pretty(&metrics)?);
    }
    Ok(display::render_overview(portfolio, &metrics))
}

fn handle_analytics(portfolio: &Portfolio, as_json: bool) -> Result<String> {
    tracing::info!(portfolio = %portfolio.id, "Computing sector weights and performance.");
    portfolio.validate()?;
    let sectors = sector_weights(&portfolio.holdings);
    let performance = performance_table(&portfolio.holdings);

    if as_json {
        let body = json!({ "sector_weights": sectors, "performance": performance });
        return Ok(serde_json::to_string_pretty(&body)?);
    }
    Ok(display::render_analytics(&sectors, &performance))
}

fn handle_performance(portfolio: &Portfolio, principal: Decimal, as_json: bool) -> Result<String> {
    tracing::info!(
        portfolio = %portfolio.id,
        months = portfolio.monthly_performance.len(),
        "Computing growth series."
    );
    let series = growth_series(&portfolio.monthly_performance);
    let grown = growth_of_principal(&portfolio.monthly_performance, principal);

    if as_json {
        let body = json!({ "growth": series, "growth_of_principal": grown });
        return Ok(serde_json::to_string_pretty(&body)?);
    }
    Ok(display::render_performance(&series, &grown, principal))
}

fn handle_transactions(portfolio: &Portfolio, as_json: bool) -> Result<String> {
    let ledger = transaction_ledger_sort(&portfolio.transactions);

    if as_json {
        return Ok(serde_json::to_string_pretty(&ledger)?);
    }
    Ok(display::render_ledger(&ledger))
}
