// Oracle boundary: the external text-generation service.
//
// Whatever comes back is an untrusted suggestion. This module only guarantees
// the reply is a JSON object; shape checks happen in `decode_reply` and the
// reconciler.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::metrics;

/// Longest slice of an error body kept in `OracleError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle credential is not configured")]
    MissingCredential,
    #[error("oracle unreachable: {0}")]
    Unavailable(String),
    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("oracle reply is malformed: {0}")]
    MalformedReply(String),
}

impl OracleError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            OracleError::MissingCredential => "missing_credential",
            OracleError::Unavailable(_) => "unavailable",
            OracleError::Status { .. } => "status",
            OracleError::MalformedReply(_) => "malformed",
        }
    }
}

/// Capability to turn a prompt into a parsed JSON object.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Value, OracleError>;
}

/// Decode an oracle reply into a typed structure.
pub fn decode_reply<T: DeserializeOwned>(value: Value) -> Result<T, OracleError> {
    serde_json::from_value(value).map_err(|e| OracleError::MalformedReply(e.to_string()))
}

/// Parse the text of a chat message as a JSON object. A Markdown code fence
/// around the object is tolerated.
pub fn parse_reply_content(content: &str) -> Result<Value, OracleError> {
    let text = strip_code_fence(content.trim());
    let value: Value = serde_json::from_str(text)
        .map_err(|e| OracleError::MalformedReply(format!("reply is not JSON: {e}")))?;
    if !value.is_object() {
        return Err(OracleError::MalformedReply(
            "reply is not a JSON object".to_string(),
        ));
    }
    Ok(value)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Chat-completion client for OpenRouter (or any OpenAI-compatible endpoint).
#[derive(Clone)]
pub struct OpenRouterOracle {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenRouterOracle {
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Unavailable(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, OracleError> {
        Self::new(
            config.oracle_url.clone(),
            config.oracle_model.clone(),
            config.oracle_api_key.clone(),
            config.oracle_timeout,
        )
    }

    async fn call(&self, prompt: &str) -> Result<Value, OracleError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(OracleError::MissingCredential)?;

        let body = json!({
            "model": &self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;
        tracing::debug!(
            "Oracle raw response: {}",
            text.chars().take(1000).collect::<String>()
        );

        let envelope: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| OracleError::MalformedReply(format!("bad completion envelope: {e}")))?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::MalformedReply("no message content".to_string()))?;

        parse_reply_content(&content)
    }
}

#[async_trait]
impl Oracle for OpenRouterOracle {
    async fn generate(&self, prompt: &str) -> Result<Value, OracleError> {
        let started = Instant::now();
        let result = self.call(prompt).await;
        metrics::ORACLE_CALL_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_object() {
        let value = parse_reply_content(r#" {"synergies": []} "#).unwrap();
        assert_eq!(value, json!({"synergies": []}));
    }

    #[test]
    fn test_parse_fenced_object() {
        let fenced = "```json\n{\"is_optimal\": true}\n```";
        assert_eq!(parse_reply_content(fenced).unwrap(), json!({"is_optimal": true}));
        let bare_fence = "```\n{\"a\": 1}\n```\n";
        assert_eq!(parse_reply_content(bare_fence).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_parse_rejects_prose_and_non_objects() {
        assert!(matches!(
            parse_reply_content("Sure! Here is your draft."),
            Err(OracleError::MalformedReply(_))
        ));
        assert!(matches!(
            parse_reply_content("[1, 2, 3]"),
            Err(OracleError::MalformedReply(_))
        ));
        assert!(parse_reply_content("").is_err());
    }

    #[test]
    fn test_decode_reply_maps_shape_errors() {
        #[derive(Debug, Deserialize)]
        struct Verdict {
            #[allow(dead_code)]
            is_optimal: bool,
        }
        assert!(decode_reply::<Verdict>(json!({"is_optimal": false})).is_ok());
        let err = decode_reply::<Verdict>(json!({"is_optimal": "yes"})).unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_network() {
        let oracle = OpenRouterOracle::new(
            "http://127.0.0.1:9/unreachable",
            "test-model",
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        let err = oracle.generate("hello").await.unwrap_err();
        assert!(matches!(err, OracleError::MissingCredential));
    }
}
