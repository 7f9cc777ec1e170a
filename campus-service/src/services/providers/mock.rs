//! Mock provider implementation for testing and offline runs.

use super::{CompletionProvider, ProviderError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Behavior {
    Echo,
    Fixed(String),
    Fail(ProviderError),
}

/// Mock completion provider.
///
/// Counts calls and remembers the last prompt so tests can see exactly what
/// reached the provider.
pub struct MockCompletionProvider {
    behavior: Behavior,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockCompletionProvider {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Answers `Mock response for: <prompt>`.
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn fixed(text: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fixed(text.into()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, prompt: &str, _temperature: f32) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.behavior {
            Behavior::Echo => Ok(format!("Mock response for: {}", prompt)),
            Behavior::Fixed(text) => Ok(text.clone()),
            Behavior::Fail(err) => Err(err.clone()),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            Behavior::Fail(ProviderError::NotConfigured(msg)) => {
                Err(ProviderError::NotConfigured(msg.clone()))
            }
            _ => Ok(()),
        }
    }
}
