//! Shared helpers for integration tests.

use std::sync::{Arc, Mutex};

use campus_core::RetrievalSettings;
use campus_gateway::generator::{GenerationSettings, ResponseGenerator};
use campus_gateway::pipeline::AdvisorPipeline;
use campus_gateway::prompt::PromptBuilder;
use campus_gateway::providers::{Provider, ProviderError, ProviderRequest, ProviderResponse};
use campus_knowledge::{KnowledgeStore, Retriever};

/// Provider double that replies with a fixed outcome and records every request.
pub struct ScriptedProvider {
    outcome: Result<String, ProviderError>,
    requests: Mutex<Vec<ProviderRequest>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        let text = self.outcome.clone()?;
        Ok(ProviderResponse {
            id: "scripted-1".to_string(),
            model: "scripted-model".to_string(),
            text: Some(text),
            usage: None,
            stop_reason: Some("stop".to_string()),
        })
    }
}

#[allow(dead_code)]
pub fn builtin_store() -> Arc<KnowledgeStore> {
    Arc::new(KnowledgeStore::builtin().expect("bundled knowledge base loads"))
}

/// Pipeline over the bundled knowledge base with fixed instructions.
#[allow(dead_code)]
pub fn pipeline_with(provider: Option<Arc<dyn Provider>>, history_window: usize) -> AdvisorPipeline {
    let retriever = Retriever::new(builtin_store(), RetrievalSettings::default());
    let prompts = PromptBuilder::with_instructions("You are a test admissions assistant.", history_window);
    let generator =
        provider.map(|provider| ResponseGenerator::new(provider, GenerationSettings::default()));
    AdvisorPipeline::new(retriever, prompts, generator)
}
