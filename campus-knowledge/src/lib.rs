//! Admissions knowledge base and retrieval for campus-guide.

pub mod errors;
pub mod models;
pub mod parser;
pub mod retriever;
pub mod storage;

pub use campus_core::config::{KnowledgeSettings, RetrievalSettings};
pub use errors::{KnowledgeError, KnowledgeResult};
pub use models::{Entry, Fact, Fragment, Lookup, Topic};
pub use retriever::Retriever;
pub use storage::KnowledgeStore;
