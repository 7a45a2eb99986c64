/// Inference Client — the single point of entry for calls to the text-classification backend.
///
/// Speaks the Hugging Face style `POST {base}/{model}` protocol: a JSON body with
/// `inputs`, answered by a list of `{label, score}` pairs.
///
/// One request per call. No retries here: a failed call surfaces as `InferenceError`
/// and the caller decides what to do (the resume classifier falls back).
use std::borrow::Cow;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("inference backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed backend response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("backend returned no labels")]
    EmptyResult,

    #[error("primary classifier panicked")]
    Panicked,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Connection settings for the backend, resolved from `Config`.
#[derive(Debug, Clone)]
pub struct InferenceSettings {
    pub base_url: String,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    /// Inputs longer than this many words are cut before sending.
    pub max_input_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    parameters: ClassificationParameters,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct ClassificationParameters {
    truncation: bool,
    max_length: usize,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

/// One label emitted by the backend with its probability.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    /// `[[{label, score}, ...]]`, one row per input.
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Failure { error: serde_json::Value },
}

#[derive(Debug, Deserialize)]
struct BackendError {
    error: serde_json::Value,
}

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    endpoint: String,
    model: String,
    api_token: Option<String>,
    timeout: Duration,
    max_input_tokens: usize,
}

impl InferenceClient {
    pub fn new(settings: InferenceSettings) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(InferenceError::Client)?;

        let endpoint = format!(
            "{}/{}",
            settings.base_url.trim_end_matches('/'),
            settings.model
        );

        Ok(Self {
            client,
            endpoint,
            model: settings.model,
            api_token: settings.api_token,
            timeout: settings.timeout,
            max_input_tokens: settings.max_input_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one classification request and returns the labels for that input.
    pub async fn classify(&self, inputs: &str) -> Result<Vec<LabelScore>, InferenceError> {
        let inputs = truncate_to_token_budget(inputs, self.max_input_tokens);
        let request_body = ClassificationRequest {
            inputs: &inputs,
            parameters: ClassificationParameters {
                truncation: true,
                max_length: self.max_input_tokens,
            },
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&request_body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        let labels = parse_labels(status, &body)?;
        debug!(
            "Inference call succeeded: model={}, labels={}",
            self.model,
            labels.len()
        );
        Ok(labels)
    }

    fn transport_error(&self, error: reqwest::Error) -> InferenceError {
        if error.is_timeout() {
            InferenceError::Timeout(self.timeout)
        } else {
            InferenceError::Http(error)
        }
    }
}

fn parse_labels(status: StatusCode, body: &str) -> Result<Vec<LabelScore>, InferenceError> {
    if !status.is_success() {
        let message = serde_json::from_str::<BackendError>(body)
            .map(|e| error_text(&e.error))
            .unwrap_or_else(|_| body.to_string());
        return Err(InferenceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let labels = match serde_json::from_str::<ClassificationResponse>(body)? {
        ClassificationResponse::Batched(rows) => rows.into_iter().next().unwrap_or_default(),
        ClassificationResponse::Flat(labels) => labels,
        ClassificationResponse::Failure { error } => {
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message: error_text(&error),
            })
        }
    };

    if labels.is_empty() {
        return Err(InferenceError::EmptyResult);
    }
    Ok(labels)
}

fn error_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keeps the first `max_tokens` whitespace-separated words of `text`.
///
/// Words undercount model tokens, so the backend still applies its own truncation;
/// this only bounds the payload.
pub fn truncate_to_token_budget(text: &str, max_tokens: usize) -> Cow<'_, str> {
    if text.split_whitespace().nth(max_tokens).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.split_whitespace()
            .take(max_tokens)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_batched_shape() {
        let body = r#"[[{"label":"POSITIVE","score":0.98},{"label":"NEGATIVE","score":0.02}]]"#;
        let labels = parse_labels(StatusCode::OK, body).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label, "POSITIVE");
    }

    #[test]
    fn test_parse_labels_flat_shape() {
        let body = r#"[{"label":"LABEL_0","score":0.7},{"label":"LABEL_1","score":0.3}]"#;
        let labels = parse_labels(StatusCode::OK, body).unwrap();
        assert_eq!(labels[1].label, "LABEL_1");
    }

    #[test]
    fn test_parse_labels_empty_is_error() {
        assert!(matches!(
            parse_labels(StatusCode::OK, "[]"),
            Err(InferenceError::EmptyResult)
        ));
        assert!(matches!(
            parse_labels(StatusCode::OK, "[[]]"),
            Err(InferenceError::EmptyResult)
        ));
    }

    #[test]
    fn test_parse_labels_garbage_is_malformed() {
        assert!(matches!(
            parse_labels(StatusCode::OK, "<html>oops</html>"),
            Err(InferenceError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_labels_error_status_uses_backend_message() {
        let body = r#"{"error":"Model is currently loading","estimated_time":20.0}"#;
        match parse_labels(StatusCode::SERVICE_UNAVAILABLE, body) {
            Err(InferenceError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Model is currently loading");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_labels_error_body_with_ok_status() {
        let body = r#"{"error":["input too long"]}"#;
        assert!(matches!(
            parse_labels(StatusCode::OK, body),
            Err(InferenceError::Api { status: 200, .. })
        ));
    }

    #[test]
    fn test_truncate_short_text_is_borrowed() {
        let text = "rust  engineer";
        assert!(matches!(
            truncate_to_token_budget(text, 2),
            Cow::Borrowed("rust  engineer")
        ));
    }

    #[test]
    fn test_truncate_long_text_keeps_leading_words() {
        let text = "one two three four five";
        assert_eq!(truncate_to_token_budget(text, 3), "one two three");
    }

    #[test]
    fn test_client_endpoint_joins_base_and_model() {
        let client = InferenceClient::new(InferenceSettings {
            base_url: "http://localhost:9000/models/".to_string(),
            model: "distilbert".to_string(),
            api_token: None,
            timeout: Duration::from_secs(1),
            max_input_tokens: 512,
        })
        .unwrap();
        assert_eq!(client.endpoint, "http://localhost:9000/models/distilbert");
        assert_eq!(client.model(), "distilbert");
    }
}
