//! Secrets configuration loaded from environment variables only.
//!
//! API keys are never read from or written to the settings file.

use std::env;

/// Value shipped in the sample `.env`; treated the same as an unset key.
const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// Secrets loaded exclusively from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    /// OpenAI (or compatible) API key (env: OPENAI_API_KEY)
    pub openai_api_key: Option<String>,
}

/// Errors that can occur when loading secrets
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Secret {0} is not valid unicode")]
    NotUnicode(String),
}

impl Secrets {
    /// Load secrets from environment variables.
    ///
    /// Loads a `.env` file first when present (development convenience).
    pub fn from_env() -> Result<Self, SecretsError> {
        super::load_dotenv();

        Self::from_env_inner()
    }

    /// Internal method to load from environment without loading .env
    pub(crate) fn from_env_inner() -> Result<Self, SecretsError> {
        Ok(Self {
            openai_api_key: read_key("OPENAI_API_KEY")?,
        })
    }

    /// Whether a model API key is available.
    pub fn has_model_key(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

fn read_key(name: &str) -> Result<Option<String>, SecretsError> {
    match env::var(name) {
        Ok(value) => {
            let value = value.trim();
            if value.is_empty() || value == PLACEHOLDER_API_KEY {
                Ok(None)
            } else {
                Ok(Some(value.to_string()))
            }
        }
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(SecretsError::NotUnicode(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests that modify environment variables don't run concurrently
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_secrets_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { env::set_var("OPENAI_API_KEY", "sk-test") }

        let secrets = Secrets::from_env_inner().unwrap();
        assert_eq!(secrets.openai_api_key, Some("sk-test".to_string()));
        assert!(secrets.has_model_key());
    }

    #[test]
    fn test_missing_key_is_not_an_error() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { env::remove_var("OPENAI_API_KEY") }

        let secrets = Secrets::from_env_inner().unwrap();
        assert!(secrets.openai_api_key.is_none());
        assert!(!secrets.has_model_key());
    }

    #[test]
    fn test_placeholder_and_blank_keys_are_ignored() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe { env::set_var("OPENAI_API_KEY", PLACEHOLDER_API_KEY) }
        assert!(Secrets::from_env_inner().unwrap().openai_api_key.is_none());

        unsafe { env::set_var("OPENAI_API_KEY", "   ") }
        assert!(Secrets::from_env_inner().unwrap().openai_api_key.is_none());

        unsafe { env::remove_var("OPENAI_API_KEY") }
    }
}
