use std::time::Duration;

use crate::constants::{
    CLASSIFIER_TIMEOUT_SECS, CLASSIFIER_URL, LOOKUP_TIMEOUT_SECS, NEWS_API_URL, NEWS_LANGUAGE,
    SEARCH_QUOTES_COUNT, SYMBOL_CHART_URL, SYMBOL_SEARCH_URL,
};

#[derive(Clone, Debug)]
pub struct MarketDataConfig {
    pub search_url: String,
    pub chart_url: String,
    pub quotes_count: u32,
    pub timeout: Duration,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            search_url: SYMBOL_SEARCH_URL.to_string(),
            chart_url: SYMBOL_CHART_URL.to_string(),
            quotes_count: SEARCH_QUOTES_COUNT,
            timeout: Duration::from_secs(LOOKUP_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone)]
pub struct NewsConfig {
    pub endpoint: String,
    pub api_key: String,
    pub language: String,
    pub timeout: Duration,
}

impl NewsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: NEWS_API_URL.to_string(),
            api_key: api_key.into(),
            language: NEWS_LANGUAGE.to_string(),
            timeout: Duration::from_secs(LOOKUP_TIMEOUT_SECS),
        }
    }
}

// The key never reaches logs or panic messages.
impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: CLASSIFIER_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(CLASSIFIER_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let news = NewsConfig::new("super-secret-key");
        let classifier = ClassifierConfig {
            token: Some("hf_secret".into()),
            ..ClassifierConfig::default()
        };

        let rendered = format!("{news:?} {classifier:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(!rendered.contains("hf_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn defaults_target_portuguese_news() {
        let news = NewsConfig::new("key");
        assert_eq!(news.language, "pt");
        assert_eq!(news.timeout, Duration::from_secs(LOOKUP_TIMEOUT_SECS));
    }
}
