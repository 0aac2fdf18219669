//! Provider trait for abstracting hosted model backends.

use serde::{Deserialize, Serialize};

use crate::prompt::PromptMessage;

/// One completion request; sampling settings come from configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

/// Unified usage information across providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Unified response type across providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub id: String,
    pub model: String,
    /// Text of the first choice, if the model produced any
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ProviderUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

/// Provider failures, classified at the client boundary.
///
/// Transport errors never leave a provider unclassified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure, timeout, server error or unusable response body
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The request itself was rejected; retrying the same prompt cannot help
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {message}")
        };
        match status {
            429 => Self::RateLimited(message),
            401 | 403 => Self::Unauthorized(message),
            400..=499 => Self::InvalidRequest(message),
            _ => Self::Unavailable(message),
        }
    }
}

/// Provider trait for different model backends
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Send one completion request.
    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError>;
}

/// Trimmed text content of a response, if any is left.
pub fn extract_text(response: &ProviderResponse) -> Option<String> {
    response
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(text: Option<&str>) -> ProviderResponse {
        ProviderResponse {
            id: "chatcmpl-001".to_string(),
            model: "test-model".to_string(),
            text: text.map(str::to_string),
            usage: Some(ProviderUsage {
                input_tokens: 10,
                output_tokens: 5,
            }),
            stop_reason: Some("stop".to_string()),
        }
    }

    #[test]
    fn test_extract_text() {
        assert_eq!(
            extract_text(&response(Some("  Hello, world!\n"))),
            Some("Hello, world!".to_string())
        );
        assert_eq!(extract_text(&response(Some("   "))), None);
        assert_eq!(extract_text(&response(None)), None);
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ProviderError::from_status(429, "slow down"),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            ProviderError::from_status(401, ""),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            ProviderError::from_status(403, ""),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            ProviderError::from_status(400, "bad"),
            ProviderError::InvalidRequest(_)
        ));
        assert!(matches!(
            ProviderError::from_status(422, "bad"),
            ProviderError::InvalidRequest(_)
        ));
        assert!(matches!(
            ProviderError::from_status(500, ""),
            ProviderError::Unavailable(_)
        ));
        assert!(matches!(
            ProviderError::from_status(503, ""),
            ProviderError::Unavailable(_)
        ));
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            ProviderError::from_status(500, "").to_string(),
            "provider unavailable: HTTP 500"
        );
        assert_eq!(
            ProviderError::from_status(429, "slow down").to_string(),
            "rate limited: HTTP 429: slow down"
        );
    }
}
