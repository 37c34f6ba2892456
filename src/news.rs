//! News search client.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::config::NewsConfig;
use crate::constants::NEWS_SORT_BY;
use crate::error::ServiceError;
use crate::http;
use crate::logging;
use crate::model::{publish_date, Article};

/// Resolved symbols plus the closed date interval to search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub symbols: Vec<String>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl NewsQuery {
    pub fn search_terms(&self) -> String {
        self.symbols.join(" OR ")
    }
}

/// Decoded response body, tagged by its `status` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NewsResponse {
    Ok {
        #[serde(rename = "totalResults", default)]
        total_results: u64,
        #[serde(default)]
        articles: Vec<RawArticle>,
    },
    Error {
        #[serde(default)]
        code: String,
        #[serde(default)]
        message: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
}

impl RawArticle {
    /// Description when it has content, otherwise the title.
    pub fn text(&self) -> Option<&str> {
        [self.description.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    pub fn to_article(&self) -> Option<Article> {
        let text = self.text()?;
        let published_on = publish_date(self.published_at.as_deref()?)?;
        Some(Article {
            text: text.to_string(),
            published_on,
        })
    }
}

#[allow(async_fn_in_trait)]
pub trait NewsSource {
    async fn fetch(&self, query: &NewsQuery) -> Result<NewsResponse, ServiceError>;
}

pub struct NewsApiClient {
    http: reqwest::Client,
    config: NewsConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http::client(config.timeout)?,
            config,
        })
    }
}

impl NewsSource for NewsApiClient {
    async fn fetch(&self, query: &NewsQuery) -> Result<NewsResponse, ServiceError> {
        let terms = query.search_terms();
        let from = query.from.format("%Y-%m-%d").to_string();
        let to = query.to.format("%Y-%m-%d").to_string();

        let resp = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("q", terms.as_str()),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("sortBy", NEWS_SORT_BY),
                ("language", self.config.language.as_str()),
                ("apiKey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        let decoded = decode(status, &body)?;

        logging::info(
            "news.fetch",
            "News search answered",
            json!({ "q": terms, "from": from, "to": to, "http_status": status }),
        );
        Ok(decoded)
    }
}

/// Decodes a search answer regardless of HTTP status, since rejections
/// (401, 429, ...) still carry a `{"status":"error",...}` body. Bodies that
/// are not a search answer become `Parse` on success and `Api` otherwise.
pub fn decode(status: u16, body: &str) -> Result<NewsResponse, ServiceError> {
    serde_json::from_str::<NewsResponse>(body).map_err(|err| {
        if (200..300).contains(&status) {
            ServiceError::Parse(err.to_string())
        } else {
            ServiceError::Api {
                status,
                message: body.to_string(),
            }
        }
    })
}
