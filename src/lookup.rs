use anyhow::{bail, Context, Result};
use clap::Args;

use crate::config::MarketDataConfig;
use crate::logging;
use crate::resolver::{non_blank, TickerResolver, YahooFinance};

#[derive(Debug, Args, Clone)]
pub struct LookupArgs {
    /// Ticker symbol to validate
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Company name to resolve
    #[arg(short, long)]
    pub company: Option<String>,
}

/// Runs only the resolution step and prints what would be searched for.
pub async fn run(args: LookupArgs) -> Result<()> {
    let ticker = non_blank(args.ticker.as_deref());
    let company = non_blank(args.company.as_deref());
    if ticker.is_none() && company.is_none() {
        bail!("pass --ticker and/or --company");
    }

    logging::info_simple("lookup.start", "Resolving inputs without fetching news");
    let market = YahooFinance::new(MarketDataConfig::default())
        .context("failed to build market-data client")?;
    let resolution = TickerResolver::new(market)
        .resolve_inputs(ticker, company)
        .await;

    for issue in &resolution.issues {
        eprintln!("error: {issue}");
    }
    if resolution.symbols.is_empty() {
        println!("No symbols resolved.");
    } else {
        println!("Query: {}", resolution.symbols.join(" OR "));
    }
    Ok(())
}
