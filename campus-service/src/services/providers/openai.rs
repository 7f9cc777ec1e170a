//! OpenAI completion provider.
//!
//! Calls the text completions endpoint and returns the first choice.

use super::{CompletionProvider, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

/// OpenAI text completion provider.
pub struct OpenAiCompletionProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiCompletionProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ProviderError::NotConfigured("OpenAI API key not configured".to_string())
            })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;

        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            temperature,
            "Sending request to OpenAI completions API"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited);
            }

            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "OpenAI API error {}: {}",
                status,
                api_error_message(&error_text)
            )));
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError("OpenAI returned no choices".to_string()))?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(ProviderError::ContentFiltered);
        }

        if let Some(usage) = api_response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenAI completion finished"
            );
        }

        Ok(choice.text)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.api_key().map(|_| ())
    }
}

/// Pull `error.message` out of an OpenAI error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> OpenAiConfig {
        OpenAiConfig {
            api_key: api_key.map(|k| Secret::new(k.to_string())),
            base_url: "https://api.openai.com/v1/".to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            max_tokens: 256,
            timeout_secs: 5,
        }
    }

    #[test]
    fn completions_url_trims_trailing_slash() {
        let provider = OpenAiCompletionProvider::new(config(Some("sk-test"))).unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/completions"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_at_call_time() {
        let provider = OpenAiCompletionProvider::new(config(None)).unwrap();
        let err = provider.complete("hello", 0.5).await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::NotConfigured("OpenAI API key not configured".to_string())
        );
        assert!(provider.health_check().await.is_err());
    }

    #[tokio::test]
    async fn empty_key_counts_as_missing() {
        let provider = OpenAiCompletionProvider::new(config(Some(""))).unwrap();
        assert!(provider.health_check().await.is_err());
    }

    #[test]
    fn error_message_is_extracted_from_json_body() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
        assert_eq!(api_error_message("gateway timeout"), "gateway timeout");
    }
}
