use chrono::NaiveDate;
use thiserror::Error;

/// Transport and decoding failures from the external services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// An input the user gave that could not be turned into a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputIssue {
    #[error("ticker {0:?} is not recognised by the market-data service")]
    UnresolvedTicker(String),

    #[error("no listed company matches {0:?}")]
    UnresolvedCompany(String),
}

/// Terminal error states of an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("enter at least a ticker or a company name")]
    InvalidInput,

    #[error("start date {from} is after end date {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },

    #[error("no valid ticker or company name: {}", join_issues(.0))]
    Unresolved(Vec<InputIssue>),

    #[error("news service rejected the request ({code}): {message}")]
    Fetch { code: String, message: String },

    #[error("news service unreachable: {0}")]
    Service(#[from] ServiceError),

    #[error("sentiment classification failed for all {failed} articles")]
    ClassificationFailed { failed: usize },
}

fn join_issues(issues: &[InputIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_lists_every_issue() {
        let err = AnalysisError::Unresolved(vec![
            InputIssue::UnresolvedTicker("ZZZZ".into()),
            InputIssue::UnresolvedCompany("Empresa Inexistente".into()),
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("\"ZZZZ\""));
        assert!(rendered.contains("\"Empresa Inexistente\""));
    }
}
