//! Ticker resolution and validation against a market-data service.

use serde::Deserialize;
use serde_json::json;

use crate::config::MarketDataConfig;
use crate::error::{InputIssue, ServiceError};
use crate::http::{self, check_response};
use crate::logging;

/// Lookups the resolver needs from a market-data provider.
#[allow(async_fn_in_trait)]
pub trait MarketData {
    /// Symbols matching a free-text company name, best match first.
    async fn search_symbols(&self, query: &str) -> Result<Vec<String>, ServiceError>;

    /// The symbol the service reports for `symbol`, or `None` when it has no data.
    async fn reported_symbol(&self, symbol: &str) -> Result<Option<String>, ServiceError>;
}

pub struct TickerResolver<M> {
    market: M,
}

/// Symbols accepted from the user's inputs plus the inputs that were rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub symbols: Vec<String>,
    pub issues: Vec<InputIssue>,
}

impl<M: MarketData> TickerResolver<M> {
    pub fn new(market: M) -> Self {
        Self { market }
    }

    /// Validates the ticker and resolves the company name independently.
    /// A rejected input is recorded as an issue and does not stop the other.
    pub async fn resolve_inputs(&self, ticker: Option<&str>, company: Option<&str>) -> Resolution {
        let mut resolution = Resolution::default();

        if let Some(ticker) = ticker {
            if self.validate_ticker(ticker).await {
                resolution.push_symbol(ticker.to_string());
            } else {
                resolution
                    .issues
                    .push(InputIssue::UnresolvedTicker(ticker.to_string()));
            }
        }

        if let Some(company) = company {
            match self.resolve_company_name(company).await {
                Some(symbol) => resolution.push_symbol(symbol),
                None => resolution
                    .issues
                    .push(InputIssue::UnresolvedCompany(company.to_string())),
            }
        }

        resolution
    }

    /// Top-ranked symbol for a company name. Service failures count as "not found".
    pub async fn resolve_company_name(&self, name: &str) -> Option<String> {
        match self.market.search_symbols(name).await {
            Ok(symbols) => {
                let top = symbols.into_iter().next();
                logging::info(
                    "resolver.search",
                    "Company name lookup finished",
                    json!({ "query": name, "symbol": top }),
                );
                top
            }
            Err(err) => {
                logging::warn(
                    "resolver.search_failed",
                    "Company name lookup failed; treating as not found",
                    json!({ "query": name, "error": err.to_string() }),
                );
                None
            }
        }
    }

    /// True only when the service echoes back exactly the same symbol.
    pub async fn validate_ticker(&self, symbol: &str) -> bool {
        match self.market.reported_symbol(symbol).await {
            Ok(reported) => {
                let valid = reported.as_deref() == Some(symbol);
                logging::info(
                    "resolver.validate",
                    "Ticker validation finished",
                    json!({ "symbol": symbol, "reported": reported, "valid": valid }),
                );
                valid
            }
            Err(err) => {
                logging::warn(
                    "resolver.validate_failed",
                    "Ticker validation failed; treating as invalid",
                    json!({ "symbol": symbol, "error": err.to_string() }),
                );
                false
            }
        }
    }
}

impl Resolution {
    // Ticker and company often land on the same symbol.
    fn push_symbol(&mut self, symbol: String) {
        if !self.symbols.contains(&symbol) {
            self.symbols.push(symbol);
        }
    }
}

/// Trims the input and treats blank strings as absent.
pub fn non_blank(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<QuoteMatch>,
}

#[derive(Deserialize)]
struct QuoteMatch {
    symbol: Option<String>,
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Deserialize)]
struct ChartMeta {
    symbol: Option<String>,
}

impl SearchResponse {
    fn symbols(self) -> Vec<String> {
        self.quotes.into_iter().filter_map(|q| q.symbol).collect()
    }
}

impl ChartResponse {
    fn symbol(self) -> Option<String> {
        if self.chart.error.as_ref().is_some_and(|e| !e.is_null()) {
            return None;
        }
        self.chart
            .result?
            .into_iter()
            .next()
            .and_then(|r| r.meta.symbol)
    }
}

/// Yahoo Finance search and chart endpoints.
pub struct YahooFinance {
    http: reqwest::Client,
    config: MarketDataConfig,
}

impl YahooFinance {
    pub fn new(config: MarketDataConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http::client(config.timeout)?,
            config,
        })
    }
}

impl MarketData for YahooFinance {
    async fn search_symbols(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        let count = self.config.quotes_count.to_string();
        let resp = self
            .http
            .get(&self.config.search_url)
            .query(&[
                ("q", query),
                ("quotesCount", count.as_str()),
                ("newsCount", "0"),
            ])
            .send()
            .await?;
        let data: SearchResponse = check_response(resp).await?.json().await?;
        Ok(data.symbols())
    }

    async fn reported_symbol(&self, symbol: &str) -> Result<Option<String>, ServiceError> {
        let url = format!(
            "{}/{}",
            self.config.chart_url.trim_end_matches('/'),
            urlencoding::encode(symbol)
        );
        let resp = self
            .http
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?;
        let data: ChartResponse = check_response(resp).await?.json().await?;
        Ok(data.symbol())
    }
}
