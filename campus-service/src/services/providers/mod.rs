//! Completion provider abstraction and implementations.
//!
//! The service only ever needs one thing from a model vendor: turn a prompt
//! into text. Backends (OpenAI, mock) sit behind [`CompletionProvider`] so the
//! dispatcher never knows which one it is talking to.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::ProviderError(anyhow::Error::new(err))
    }
}

/// Trait for text completion providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Name reported by health checks and metrics.
    fn name(&self) -> &'static str;

    /// Send a rendered prompt and return the generated text.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError>;

    /// Whether the provider can serve requests. Must not call the vendor.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
