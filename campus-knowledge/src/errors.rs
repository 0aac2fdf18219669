#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("unknown knowledge path: {0}")]
    NotFound(String),
    #[error("invalid knowledge document: {0}")]
    InvalidDocument(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
