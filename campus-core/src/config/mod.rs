//! Configuration management for campus-guide.
//!
//! Secrets come from environment variables, settings from a TOML file.
//!
//! # Configuration Sources
//!
//! ## Secrets (Environment Variables)
//! - `OPENAI_API_KEY` - model API key; when absent the gateway answers from
//!   the knowledge base only
//!
//! ## Settings (TOML File)
//! Located at `~/.config/campus-guide/config.toml`:
//! ```toml
//! [model]
//! model = "gpt-4o-mini"
//! max_tokens = 1000
//!
//! [retrieval]
//! max_fragments = 5
//!
//! [gateway]
//! host = "127.0.0.1"
//! port = 8080
//! ```

pub mod knowledge;
mod secrets;
mod settings;

pub use knowledge::{KnowledgeSettings, RetrievalSettings};
pub use secrets::{Secrets, SecretsError};
pub use settings::{
    CampusSettings, GatewaySettings, LoggingSettings, ModelSettings, PromptSettings, Settings, SettingsError,
};

/// Combined configuration containing both secrets and settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secrets loaded from environment variables
    pub secrets: Secrets,
    /// Settings loaded from TOML configuration file
    pub settings: Settings,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Secrets error: {0}")]
    Secrets(#[from] SecretsError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file cannot be read or parsed, or if a
    /// secret is not valid unicode. A missing API key is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let secrets = Secrets::from_env()?;
        let settings = Settings::load()?;

        Ok(Self { secrets, settings })
    }

    /// Whether the hosted model should be called at all.
    pub fn model_enabled(&self) -> bool {
        self.settings.model.enabled && self.secrets.has_model_key()
    }

    /// Get the model API key (if configured).
    pub fn openai_api_key(&self) -> Option<&str> {
        self.secrets.openai_api_key.as_deref()
    }

    /// Get the HTTP bind address.
    pub fn bind_addr(&self) -> String {
        self.settings.bind_addr()
    }
}

/// Load .env file if it exists (for development convenience).
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_enabled_requires_key_and_setting() {
        let mut config = Config {
            secrets: Secrets::default(),
            settings: Settings::default(),
        };
        assert!(!config.model_enabled());

        config.secrets.openai_api_key = Some("sk-test".to_string());
        assert!(config.model_enabled());
        assert_eq!(config.openai_api_key(), Some("sk-test"));

        config.settings.model.enabled = false;
        assert!(!config.model_enabled());
    }

    #[test]
    fn test_bind_addr() {
        let mut settings = Settings::default();
        settings.gateway.host = "0.0.0.0".to_string();
        settings.gateway.port = 3001;
        let config = Config {
            secrets: Secrets::default(),
            settings,
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }
}
