pub const NEWS_API_URL: &str = "https://newsapi.org/v2/everything";
pub const SYMBOL_SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
pub const SYMBOL_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const CLASSIFIER_URL: &str =
    "https://api-inference.huggingface.co/models/nlptown/bert-base-multilingual-uncased-sentiment";
pub const NEWS_LANGUAGE: &str = "pt";
pub const NEWS_SORT_BY: &str = "publishedAt";
pub const SEARCH_QUOTES_COUNT: u32 = 5;
pub const LOOKUP_TIMEOUT_SECS: u64 = 15;
pub const CLASSIFIER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOOKBACK_DAYS: i64 = 21;
pub const CSV_FILE_NAME: &str = "sentiment_by_date.csv";
pub const USER_AGENT: &str = concat!("news-sentiment/", env!("CARGO_PKG_VERSION"));
