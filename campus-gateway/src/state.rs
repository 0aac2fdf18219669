//! Shared application state for the HTTP gateway.

use std::sync::Arc;

use tracing::info;

use campus_core::{CampusSettings, Config};
use campus_knowledge::{KnowledgeStore, Retriever};

use crate::generator::{GenerationSettings, ResponseGenerator};
use crate::pipeline::AdvisorPipeline;
use crate::prompt::PromptBuilder;
use crate::providers::openai_compatible::OpenAiCompatibleClient;
use crate::server::ServerError;

/// Provider name reported in logs for the hosted model.
const OPENAI_PROVIDER: &str = "openai";

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<AdvisorPipeline>,
    pub quick_questions: Vec<String>,
    pub campus: CampusSettings,
}

impl AppState {
    pub fn new(pipeline: Arc<AdvisorPipeline>, quick_questions: Vec<String>) -> Self {
        Self {
            pipeline,
            quick_questions,
            campus: CampusSettings::default(),
        }
    }

    pub fn with_campus(mut self, campus: CampusSettings) -> Self {
        self.campus = campus;
        self
    }

    /// Load the knowledge base and wire the pipeline from configuration.
    ///
    /// Without an API key (or with `[model] enabled = false`) the pipeline
    /// answers from the knowledge base only.
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let store = match &config.settings.knowledge.path {
            Some(path) => {
                info!("Loading knowledge base from {}", path.display());
                KnowledgeStore::load(path)?
            }
            None => KnowledgeStore::builtin()?,
        };
        info!(
            "Knowledge base ready ({} categories, {} facts)",
            store.categories().len(),
            store.leaf_count()
        );

        let retriever = Retriever::new(Arc::new(store), config.settings.retrieval.clone());
        let prompts = PromptBuilder::new(&config.settings.prompt)?;

        let generator = if config.model_enabled() {
            let model = &config.settings.model;
            let client = OpenAiCompatibleClient::new(
                &model.base_url,
                config.openai_api_key().map(str::to_string),
                OPENAI_PROVIDER,
                model.timeout(),
            )?;
            info!("Model client created: {} via {}", model.model, model.base_url);
            Some(ResponseGenerator::new(
                Arc::new(client),
                GenerationSettings::from(model),
            ))
        } else {
            info!("Model disabled (set OPENAI_API_KEY to enable); answering from the knowledge base only");
            None
        };

        let pipeline = AdvisorPipeline::new(retriever, prompts, generator);
        Ok(Self::new(
            Arc::new(pipeline),
            config.settings.gateway.quick_questions.clone(),
        )
        .with_campus(config.settings.campus.clone()))
    }
}
