//! Sentiment classification backed by a hosted text-classification model.
//!
//! The model rates text from one to five stars; [`Sentiment::from_stars`]
//! folds that scale into the three buckets the pipeline counts.

use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::error::ServiceError;
use crate::http::{self, check_response};
use crate::model::Sentiment;

#[allow(async_fn_in_trait)]
pub trait SentimentClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment, ServiceError>;
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

// The inference API nests candidates one level deeper for single inputs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_candidates(self) -> Vec<LabelScore> {
        match self {
            InferenceResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(candidates) => candidates,
        }
    }
}

fn best_label(candidates: Vec<LabelScore>) -> Result<Sentiment, ServiceError> {
    let best = candidates
        .into_iter()
        .filter(|c| c.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ServiceError::Parse("classifier returned no labels".to_string()))?;
    best.label.parse().map_err(ServiceError::Parse)
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// Client for a Hugging Face style inference endpoint.
pub struct HostedClassifier {
    http: reqwest::Client,
    config: ClassifierConfig,
}

impl HostedClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http::client(config.timeout)?,
            config,
        })
    }
}

impl SentimentClassifier for HostedClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment, ServiceError> {
        let mut request = self.http.post(&self.config.endpoint).json(&InferenceRequest {
            inputs: text,
            options: InferenceOptions {
                wait_for_model: true,
            },
        });
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let resp = check_response(request.send().await?).await?;
        let data: InferenceResponse = resp.json().await?;
        best_label(data.into_candidates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_FIXTURE: &str = r#"[[
        {"label": "5 stars", "score": 0.61},
        {"label": "4 stars", "score": 0.27},
        {"label": "3 stars", "score": 0.07},
        {"label": "2 stars", "score": 0.03},
        {"label": "1 star", "score": 0.02}
    ]]"#;

    #[test]
    fn nested_response_picks_highest_score() {
        let data: InferenceResponse = serde_json::from_str(NESTED_FIXTURE).unwrap();
        assert_eq!(best_label(data.into_candidates()).unwrap(), Sentiment::Positive);
    }

    #[test]
    fn flat_response_is_accepted() {
        let data: InferenceResponse = serde_json::from_str(
            r#"[{"label": "1 star", "score": 0.2}, {"label": "2 stars", "score": 0.5}, {"label": "3 stars", "score": 0.3}]"#,
        )
        .unwrap();
        assert_eq!(best_label(data.into_candidates()).unwrap(), Sentiment::Negative);
    }

    #[test]
    fn neutral_middle_star() {
        let data: InferenceResponse =
            serde_json::from_str(r#"[[{"label": "3 stars", "score": 0.9}]]"#).unwrap();
        assert_eq!(best_label(data.into_candidates()).unwrap(), Sentiment::Neutral);
    }

    #[test]
    fn empty_or_unknown_labels_are_errors() {
        assert!(matches!(best_label(Vec::new()), Err(ServiceError::Parse(_))));
        let unknown = vec![LabelScore {
            label: "LABEL_7".into(),
            score: 0.9,
        }];
        assert!(matches!(best_label(unknown), Err(ServiceError::Parse(_))));
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(InferenceRequest {
            inputs: "Ações sobem",
            options: InferenceOptions {
                wait_for_model: true,
            },
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"inputs": "Ações sobem", "options": {"wait_for_model": true}})
        );
    }
}
