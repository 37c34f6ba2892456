use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use clap::Args;
use serde_json::json;

use crate::chart::{self, ChartSize};
use crate::classifier::HostedClassifier;
use crate::config::{ClassifierConfig, MarketDataConfig, NewsConfig};
use crate::constants::{CSV_FILE_NAME, DEFAULT_LOOKBACK_DAYS};
use crate::error::{AnalysisError, InputIssue};
use crate::logging;
use crate::news::NewsApiClient;
use crate::resolver::YahooFinance;
use crate::workflow::{AnalysisRequest, Analyzer, Outcome};

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Ticker symbol to validate and search for (e.g. AAPL)
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Company name to resolve to a ticker (e.g. "Apple Inc.")
    #[arg(short, long)]
    pub company: Option<String>,

    /// First day of the search window (YYYY-MM-DD); defaults to three weeks ago
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the search window (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Where to save the per-date sentiment table
    #[arg(short, long, default_value = CSV_FILE_NAME)]
    pub output: PathBuf,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Token for the hosted sentiment model
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,

    /// Sentiment model inference endpoint
    #[arg(long, env = "SENTIMENT_MODEL_URL")]
    pub model_url: Option<String>,

    /// News language filter
    #[arg(long)]
    pub language: Option<String>,

    /// Per-request timeout for the lookup and news services, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(flatten)]
    pub size: ChartSize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            ticker: None,
            company: None,
            from: None,
            to: None,
            output: PathBuf::from(CSV_FILE_NAME),
            api_key: None,
            hf_token: None,
            model_url: None,
            language: None,
            timeout_secs: None,
            size: ChartSize {
                width: 120,
                height: 30,
            },
        }
    }
}

impl AnalyzeArgs {
    /// Fills in the default window: the last three weeks ending `today`.
    pub fn request(&self, today: NaiveDate) -> AnalysisRequest {
        let to = self.to.unwrap_or(today);
        let from = self.from.unwrap_or_else(|| {
            to.checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS as u64))
                .unwrap_or(to)
        });
        AnalysisRequest {
            ticker: self.ticker.clone(),
            company: self.company.clone(),
            from,
            to,
        }
    }
}

pub async fn run(args: AnalyzeArgs) -> Result<()> {
    let request = args.request(Utc::now().date_naive());
    if let Err(err) = request.check() {
        report_failure(&err);
        return Ok(());
    }

    let api_key = args
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .context("a NewsAPI key is required; pass --api-key or set NEWSAPI_API_KEY")?;

    let mut market_config = MarketDataConfig::default();
    let mut news_config = NewsConfig::new(api_key);
    if let Some(secs) = args.timeout_secs {
        market_config.timeout = Duration::from_secs(secs);
        news_config.timeout = Duration::from_secs(secs);
    }
    if let Some(language) = &args.language {
        news_config.language = language.clone();
    }
    let mut classifier_config = ClassifierConfig {
        token: args.hf_token.clone(),
        ..ClassifierConfig::default()
    };
    if let Some(url) = &args.model_url {
        classifier_config.endpoint = url.clone();
    }

    // Built once and shared for every article in the run.
    let analyzer = Analyzer::new(
        YahooFinance::new(market_config).context("failed to build market-data client")?,
        NewsApiClient::new(news_config).context("failed to build news client")?,
        HostedClassifier::new(classifier_config).context("failed to build classifier client")?,
    );

    match analyzer.run(&request).await {
        Ok(Outcome::Empty { query, issues }) => {
            report_issues(&issues);
            println!(
                "No news found for {} between {} and {}.",
                query.search_terms(),
                query.from,
                query.to
            );
        }
        Ok(Outcome::Rendered(report)) => {
            report_issues(&report.issues);
            println!(
                "News for {} between {} and {}",
                report.query.search_terms(),
                report.query.from,
                report.query.to
            );
            chart::present(&report.table, args.size);
            if report.skipped > 0 {
                println!("Skipped articles: {}", report.skipped);
            }
            chart::save_csv(&report.table, &args.output)?;
            println!("Saved {} (text/csv)", args.output.display());
        }
        Err(err) => report_failure(&err),
    }

    Ok(())
}

fn report_issues(issues: &[InputIssue]) {
    for issue in issues {
        eprintln!("error: {issue}");
    }
}

// Every terminal error is shown to the user and the process still exits cleanly.
fn report_failure(err: &AnalysisError) {
    match err {
        AnalysisError::Unresolved(issues) => {
            report_issues(issues);
            eprintln!("error: enter at least one valid ticker or company name");
        }
        AnalysisError::InvertedDateRange { .. } => eprintln!("warning: {err}"),
        other => eprintln!("error: {other}"),
    }
    logging::error(
        "analyze.failed",
        "Analysis did not produce a chart",
        json!({ "error": err.to_string() }),
    );
}
