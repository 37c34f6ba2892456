//! The analysis run: resolve inputs, fetch news, classify, aggregate.

use std::fmt;

use chrono::NaiveDate;
use serde_json::json;

use crate::aggregate::{aggregate, SentimentTable};
use crate::classifier::SentimentClassifier;
use crate::error::{AnalysisError, InputIssue};
use crate::logging;
use crate::model::SentimentRecord;
use crate::news::{NewsQuery, NewsResponse, NewsSource};
use crate::resolver::{non_blank, MarketData, TickerResolver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub ticker: Option<String>,
    pub company: Option<String>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl AnalysisRequest {
    /// Checks that need no network: at least one input, and an ordered window.
    /// An inverted window (`from > to`) ends the run before any lookup.
    pub fn check(&self) -> Result<(), AnalysisError> {
        let ticker = non_blank(self.ticker.as_deref());
        let company = non_blank(self.company.as_deref());
        if ticker.is_none() && company.is_none() {
            return Err(AnalysisError::InvalidInput);
        }
        if self.from > self.to {
            return Err(AnalysisError::InvertedDateRange {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    InputCollected,
    Validating,
    Querying,
    Empty,
    Rendered,
    Error,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Idle => "idle",
            Stage::InputCollected => "input_collected",
            Stage::Validating => "validating",
            Stage::Querying => "querying",
            Stage::Empty => "empty",
            Stage::Rendered => "rendered",
            Stage::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub query: NewsQuery,
    pub table: SentimentTable,
    /// Articles that made it into the table.
    pub analyzed: usize,
    /// Articles dropped for missing text or date, or a failed classification.
    pub skipped: usize,
    pub issues: Vec<InputIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The query was valid but matched no articles.
    Empty {
        query: NewsQuery,
        issues: Vec<InputIssue>,
    },
    Rendered(Report),
}

impl Outcome {
    pub fn stage(&self) -> Stage {
        match self {
            Outcome::Empty { .. } => Stage::Empty,
            Outcome::Rendered(_) => Stage::Rendered,
        }
    }
}

pub struct Analyzer<M, N, C> {
    resolver: TickerResolver<M>,
    news: N,
    classifier: C,
}

impl<M, N, C> Analyzer<M, N, C>
where
    M: MarketData,
    N: NewsSource,
    C: SentimentClassifier,
{
    pub fn new(market: M, news: N, classifier: C) -> Self {
        Self {
            resolver: TickerResolver::new(market),
            news,
            classifier,
        }
    }

    pub async fn run(&self, request: &AnalysisRequest) -> Result<Outcome, AnalysisError> {
        enter(Stage::Idle);
        let result = self.run_stages(request).await;
        match &result {
            Ok(outcome) => enter(outcome.stage()),
            Err(err) => {
                enter(Stage::Error);
                logging::warn(
                    "workflow.failed",
                    "Analysis run ended in an error state",
                    json!({ "error": err.to_string() }),
                );
            }
        }
        result
    }

    async fn run_stages(&self, request: &AnalysisRequest) -> Result<Outcome, AnalysisError> {
        request.check()?;
        let ticker = non_blank(request.ticker.as_deref());
        let company = non_blank(request.company.as_deref());
        enter(Stage::InputCollected);

        enter(Stage::Validating);
        let resolution = self.resolver.resolve_inputs(ticker, company).await;
        if resolution.symbols.is_empty() {
            return Err(AnalysisError::Unresolved(resolution.issues));
        }

        let query = NewsQuery {
            symbols: resolution.symbols,
            from: request.from,
            to: request.to,
        };
        let issues = resolution.issues;

        enter(Stage::Querying);
        let articles = match self.news.fetch(&query).await? {
            NewsResponse::Error { code, message } => {
                return Err(AnalysisError::Fetch { code, message });
            }
            NewsResponse::Ok {
                total_results,
                articles,
            } => {
                if total_results == 0 || articles.is_empty() {
                    return Ok(Outcome::Empty { query, issues });
                }
                articles
            }
        };

        let mut records = Vec::with_capacity(articles.len());
        let mut unusable = 0usize;
        let mut failed = 0usize;
        for raw in &articles {
            let Some(article) = raw.to_article() else {
                unusable += 1;
                logging::warn(
                    "workflow.article_skipped",
                    "Article has no text or no parseable publish date",
                    json!({ "title": raw.title, "published_at": raw.published_at }),
                );
                continue;
            };

            match self.classifier.classify(&article.text).await {
                Ok(label) => records.push(SentimentRecord {
                    date: article.published_on,
                    label,
                }),
                Err(err) => {
                    failed += 1;
                    logging::warn(
                        "workflow.classify_failed",
                        "Sentiment classification failed; skipping article",
                        json!({ "error": err.to_string(), "date": article.published_on.to_string() }),
                    );
                }
            }
        }

        if records.is_empty() {
            if failed > 0 {
                return Err(AnalysisError::ClassificationFailed { failed });
            }
            return Ok(Outcome::Empty { query, issues });
        }

        let table = aggregate(&records);
        logging::info(
            "workflow.aggregated",
            "Sentiment table built",
            json!({
                "articles": articles.len(),
                "analyzed": records.len(),
                "skipped": unusable + failed,
                "dates": table.len(),
            }),
        );

        Ok(Outcome::Rendered(Report {
            query,
            table,
            analyzed: records.len(),
            skipped: unusable + failed,
            issues,
        }))
    }
}

fn enter(stage: Stage) {
    logging::info(
        "workflow.stage",
        "Workflow entered a new stage",
        json!({ "stage": stage.to_string() }),
    );
}
