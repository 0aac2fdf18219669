//! Model-backed answer generation.
//!
//! One request per prompt, bounded by a timeout, never retried. Every failure
//! comes back as a [`GenerationError`] so the pipeline can decide between the
//! fallback answer and surfacing a bug.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use campus_core::ModelSettings;

use crate::prompt::Prompt;
use crate::providers::{Provider, ProviderError, ProviderRequest, ProviderUsage, extract_text};

/// Fixed sampling policy applied to every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&ModelSettings::default())
    }
}

impl From<&ModelSettings> for GenerationSettings {
    fn from(settings: &ModelSettings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            top_p: settings.top_p,
            timeout: settings.timeout(),
        }
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Trimmed, non-empty answer text
    pub text: String,
    /// Provider stop reason (`"stop"`, `"length"`, ...), when reported
    pub finish_reason: Option<String>,
    pub token_usage: Option<ProviderUsage>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("model unavailable: {0}")]
    Unavailable(String),
    #[error("model rate limited: {0}")]
    RateLimited(String),
    #[error("model rejected credentials: {0}")]
    Unauthorized(String),
    #[error("model rejected request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::RateLimited(_) => "rate_limited",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<ProviderError> for GenerationError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Unavailable(message) => Self::Unavailable(message),
            ProviderError::RateLimited(message) => Self::RateLimited(message),
            ProviderError::Unauthorized(message) => Self::Unauthorized(message),
            ProviderError::InvalidRequest(message) => Self::InvalidRequest(message),
        }
    }
}

pub type GenerationResult = Result<Generation, GenerationError>;

#[derive(Clone)]
pub struct ResponseGenerator {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
}

impl fmt::Debug for ResponseGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseGenerator")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ResponseGenerator {
    pub fn new(provider: Arc<dyn Provider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Send `prompt` once and classify the outcome.
    pub async fn generate(&self, prompt: &Prompt) -> GenerationResult {
        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages: prompt.messages.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
        };

        let response =
            match tokio::time::timeout(self.settings.timeout, self.provider.complete(&request))
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(GenerationError::Unavailable(format!(
                        "no response within {}s",
                        self.settings.timeout.as_secs_f32()
                    )));
                }
            };

        let text = extract_text(&response)
            .ok_or_else(|| GenerationError::Unavailable("empty completion".to_string()))?;

        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            output_tokens = response.usage.map(|u| u.output_tokens),
            finish_reason = response.stop_reason.as_deref(),
            "generation complete"
        );

        Ok(Generation {
            text,
            finish_reason: response.stop_reason,
            token_usage: response.usage,
            model: response.model,
        })
    }
}
