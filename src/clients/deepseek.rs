pub mod models;

use crate::config::{KeyFromEnv, Settings, DEFAULT_BASE_URL};
use crate::core::{LowLevelClient, ModelTier};
use crate::error::{AIError, DeepSeekError};
use async_trait::async_trait;
use models::DeepSeekModel;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Serialize)]
struct DeepSeekRequest<'a> {
    model: &'a str,
    messages: Vec<DeepSeekMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct DeepSeekMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponse {
    choices: Vec<DeepSeekChoice>,
}

#[derive(Debug, Deserialize)]
struct DeepSeekChoice {
    message: DeepSeekResponseMessage,
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct DeepSeekErrorBody {
    error: DeepSeekErrorDetail,
}

#[derive(Debug, Deserialize)]
struct DeepSeekErrorDetail {
    message: Option<String>,
}

/// Configuration for DeepSeek client
#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: 4000,
            temperature: 0.7,
        }
    }
}

/// Map a non-success status and its body to a provider error.
pub fn classify_status(status: StatusCode, body: &str) -> DeepSeekError {
    match status {
        StatusCode::UNAUTHORIZED => DeepSeekError::Authentication,
        StatusCode::TOO_MANY_REQUESTS => DeepSeekError::RateLimit,
        s if s.is_server_error() => DeepSeekError::Server(s.as_u16()),
        s => {
            let message = serde_json::from_str::<DeepSeekErrorBody>(body)
                .ok()
                .and_then(|b| b.error.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("API request failed: {}", s));
            DeepSeekError::Api(message)
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    config: DeepSeekConfig,
    client: Client,
}

impl KeyFromEnv for DeepSeekClient {
    const KEY_NAME: &'static str = "DEEPSEEK_API_KEY";
}

impl DeepSeekClient {
    /// Create a new DeepSeek client with full configuration
    pub fn new(config: DeepSeekConfig) -> Self {
        info!(base_url = %config.base_url, "Creating new DeepSeek client");
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Client from process settings. Fails when no usable key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, AIError> {
        let api_key = settings.api_key.clone().ok_or(DeepSeekError::MissingKey)?;
        Ok(Self::new(DeepSeekConfig {
            api_key,
            base_url: settings.base_url.clone(),
            ..DeepSeekConfig::default()
        }))
    }

    pub fn from_env() -> Result<Self, AIError> {
        Self::from_settings(&Settings::from_env())
    }

    pub fn config(&self) -> &DeepSeekConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LowLevelClient for DeepSeekClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn ask_raw(&self, prompt: String, tier: ModelTier) -> Result<String, AIError> {
        if self.config.api_key.trim().is_empty() {
            error!("DeepSeek API key not configured");
            return Err(DeepSeekError::MissingKey.into());
        }

        let model = DeepSeekModel::from(tier);
        debug!(model = model.id(), prompt_len = prompt.len(), "Preparing DeepSeek API request");

        let request = DeepSeekRequest {
            model: model.id(),
            messages: vec![DeepSeekMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                AIError::DeepSeek(DeepSeekError::Http(e.to_string()))
            })?;

        let status = response.status();
        debug!(%status, "Received response from DeepSeek API");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_status(status, &body);
            match err {
                DeepSeekError::RateLimit => warn!("DeepSeek API rate limit exceeded"),
                _ => error!(%status, error = %err, "DeepSeek API error"),
            }
            return Err(err.into());
        }

        let deepseek_response: DeepSeekResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse DeepSeek response JSON");
            AIError::DeepSeek(DeepSeekError::Api(format!("Malformed response: {}", e)))
        })?;

        let text = deepseek_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                error!("No choices in DeepSeek response");
                AIError::DeepSeek(DeepSeekError::Api("No choices in response".to_string()))
            })?;

        info!(response_len = text.len(), model = model.id(), "Successfully received DeepSeek response");
        Ok(text)
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }

    fn model_name(&self, tier: ModelTier) -> String {
        DeepSeekModel::from(tier).id().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(classify_status(StatusCode::UNAUTHORIZED, ""), DeepSeekError::Authentication);
        assert_eq!(classify_status(StatusCode::TOO_MANY_REQUESTS, ""), DeepSeekError::RateLimit);
        assert_eq!(classify_status(StatusCode::BAD_GATEWAY, ""), DeepSeekError::Server(502));
        assert_eq!(
            classify_status(StatusCode::BAD_REQUEST, r#"{"error":{"message":"context too long"}}"#),
            DeepSeekError::Api("context too long".to_string())
        );
        assert!(matches!(
            classify_status(StatusCode::PAYMENT_REQUIRED, "nope"),
            DeepSeekError::Api(m) if m.contains("402")
        ));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client = DeepSeekClient::new(DeepSeekConfig {
            base_url: "http://localhost:9000/v1/".into(),
            ..DeepSeekConfig::default()
        });
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = DeepSeekClient::new(DeepSeekConfig::default());
        let err = client.ask_raw("hi".into(), ModelTier::Fast).await.unwrap_err();
        assert!(err.is_missing_key());
    }

    #[test]
    fn settings_without_key_is_missing_key() {
        let err = DeepSeekClient::from_settings(&Settings::default()).unwrap_err();
        assert!(err.is_missing_key());
    }
}
