//! Settings configuration loaded from TOML files.
//!
//! This module handles non-sensitive configuration stored in TOML format
//! in the XDG config directory (~/.config/campus-guide/config.toml).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::knowledge::{KnowledgeSettings, RetrievalSettings};

/// Default TOML configuration file content
const DEFAULT_CONFIG_TOML: &str = r#"# campus-guide configuration file
# Located at: ~/.config/campus-guide/config.toml
#
# This file contains non-sensitive configuration.
# Secrets (API keys) are loaded from environment variables:
#   - OPENAI_API_KEY (leave unset to answer from the knowledge base only)

[model]
enabled = true
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
max_tokens = 1000
temperature = 0.7
top_p = 0.9
timeout_seconds = 30

[prompt]
institution = "CUNY (City University of New York)"
history_window = 6

[retrieval]
max_fragments = 5
history_user_turns = 2
min_term_len = 3

[knowledge]
# path = "/srv/campus-guide/knowledge.toml"  # Bundled knowledge base if unset

[gateway]
host = "127.0.0.1"
port = 8080

[campus]
name = "City University of New York (CUNY)"
# campuses, total_students, founded, type and [campus.quick_responses]
# default to the CUNY profile when omitted

[logging]
level = "info"
"#;

/// Settings loaded from TOML configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    /// Language model generation settings
    #[serde(default)]
    pub model: ModelSettings,

    /// Prompt assembly settings
    #[serde(default)]
    pub prompt: PromptSettings,

    /// Knowledge retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Knowledge base source
    #[serde(default)]
    pub knowledge: KnowledgeSettings,

    /// Gateway server configuration
    #[serde(default)]
    pub gateway: GatewaySettings,

    /// Institution profile and canned replies served by the gateway
    #[serde(default)]
    pub campus: CampusSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Generation policy for the hosted model.
///
/// These are fixed for the lifetime of the process; requests cannot override them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelSettings {
    /// When false the gateway never calls the model and always falls back
    #[serde(default = "default_model_enabled")]
    pub enabled: bool,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model_name")]
    pub model: String,

    /// Maximum number of generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling parameter
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Upper bound on a single model call, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ModelSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

/// Prompt assembly settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptSettings {
    /// Institution name rendered into the system instructions
    #[serde(default = "default_institution")]
    pub institution: String,

    /// Number of most recent conversation turns forwarded to the model
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

/// Gateway server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewaySettings {
    /// Host to bind to
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Suggested questions offered by the chat widget
    #[serde(default = "default_quick_questions")]
    pub quick_questions: Vec<String>,
}

/// Institution profile (`GET /api/campus-info`) and per-topic canned replies.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CampusSettings {
    #[serde(default = "default_campus_name")]
    pub name: String,

    #[serde(default = "default_campuses")]
    pub campuses: Vec<String>,

    #[serde(default = "default_total_students")]
    pub total_students: String,

    #[serde(default = "default_founded")]
    pub founded: String,

    /// Kind of institution, e.g. "Public University System"
    #[serde(rename = "type", default = "default_institution_type")]
    pub kind: String,

    /// Topic -> short canned answer
    #[serde(default = "default_quick_responses")]
    pub quick_responses: BTreeMap<String, String>,

    /// Reply for a topic without a canned answer
    #[serde(default = "default_quick_response_fallback")]
    pub quick_response_fallback: String,
}

impl CampusSettings {
    pub fn quick_response(&self, topic: &str) -> &str {
        self.quick_responses
            .get(topic.trim())
            .unwrap_or(&self.quick_response_fallback)
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_model_enabled() -> bool {
    true
}

fn default_model_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_institution() -> String {
    "CUNY (City University of New York)".to_string()
}

fn default_history_window() -> usize {
    6
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_quick_questions() -> Vec<String> {
    [
        "What are the admission requirements?",
        "How much is tuition?",
        "What scholarships are available?",
        "When are the application deadlines?",
        "What majors are offered?",
        "How do I schedule a campus tour?",
        "What housing options are available?",
        "What meal plans are offered?",
        "How safe is the campus?",
        "What student activities are available?",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_campus_name() -> String {
    "City University of New York (CUNY)".to_string()
}

fn default_campuses() -> Vec<String> {
    [
        "Baruch College",
        "Brooklyn College",
        "City College",
        "Hunter College",
        "Queens College",
        "Lehman College",
        "College of Staten Island",
        "York College",
        "Medgar Evers College",
        "John Jay College of Criminal Justice",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_total_students() -> String {
    "275,000+".to_string()
}

fn default_founded() -> String {
    "1847".to_string()
}

fn default_institution_type() -> String {
    "Public University System".to_string()
}

fn default_quick_responses() -> BTreeMap<String, String> {
    [
        (
            "admissions",
            "CUNY has rolling admissions with priority deadlines. You'll need transcripts, personal statement, and letters of recommendation. Application fee is $65. Would you like specific requirements for your program?",
        ),
        (
            "tuition",
            "CUNY tuition is very affordable! NY residents pay about $3,465 per semester for undergraduate programs. Non-residents pay $620 per credit. Plus there are many scholarship opportunities!",
        ),
        (
            "scholarships",
            "CUNY offers excellent scholarships! We have merit-based awards up to $6,500/year, Presidential Scholarships for full tuition, and need-based grants. Have you completed your FAFSA?",
        ),
        (
            "campus_life",
            "CUNY campuses offer vibrant student life! We have 200+ clubs, NCAA sports, cultural events, and leadership programs. Housing options include on-campus and off-campus arrangements. What interests you most?",
        ),
        (
            "majors",
            "CUNY offers 100+ majors across all campuses! Popular programs include Business, Computer Science, Psychology, Engineering, and Education. What field interests you? I can help you find the right program!",
        ),
    ]
    .into_iter()
    .map(|(topic, reply)| (topic.to_string(), reply.to_string()))
    .collect()
}

fn default_quick_response_fallback() -> String {
    "I'm here to help! What would you like to know about CUNY?".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            enabled: default_model_enabled(),
            base_url: default_model_base_url(),
            model: default_model_name(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            institution: default_institution(),
            history_window: default_history_window(),
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            quick_questions: default_quick_questions(),
        }
    }
}

impl Default for CampusSettings {
    fn default() -> Self {
        Self {
            name: default_campus_name(),
            campuses: default_campuses(),
            total_students: default_total_students(),
            founded: default_founded(),
            kind: default_institution_type(),
            quick_responses: default_quick_responses(),
            quick_response_fallback: default_quick_response_fallback(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

impl Settings {
    /// Load settings from the TOML configuration file.
    ///
    /// If the config file doesn't exist, creates it with default values.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("Creating default configuration at {:?}", config_path);
            Self::create_default_config(&config_path)?;
        }

        Self::load_from_path(&config_path)
    }

    /// Load settings from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        Ok(settings)
    }

    /// Get the configuration file path.
    ///
    /// `CAMPUS_GUIDE_CONFIG_DIR` overrides the XDG config directory.
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        if let Ok(override_dir) = std::env::var("CAMPUS_GUIDE_CONFIG_DIR") {
            let dir = PathBuf::from(override_dir);
            return Ok(dir.join("config.toml"));
        }

        let config_dir = dirs::config_dir()
            .ok_or(SettingsError::ConfigDirNotFound)?
            .join("campus-guide");

        Ok(config_dir.join("config.toml"))
    }

    /// Get the HTTP bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.gateway.host, self.gateway.port)
    }

    fn create_default_config(path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, DEFAULT_CONFIG_TOML)?;

        Ok(())
    }
}
