//! Retrieval-augmented answer pipeline.
//!
//! Each request moves through
//! `Received -> Retrieved -> PromptBuilt -> (Generated | Fallback) -> Delivered`.
//! A failed model call gets exactly one recovery: the fallback answer built
//! from the same fragments.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use campus_core::ChatRequest;
use campus_knowledge::{Fragment, KnowledgeStore, Retriever};

use crate::fallback::FallbackAnswerer;
use crate::generator::{GenerationError, ResponseGenerator};
use crate::prompt::PromptBuilder;

/// Which terminal state produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineAnswer {
    pub response: String,
    pub source: AnswerSource,
    /// Fragments the answer was grounded on
    pub fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("message cannot be empty")]
    EmptyMessage,
    /// The model rejected the prompt itself. `fallback` is still a usable answer.
    #[error("model rejected the prompt: {message}")]
    InvalidRequest { message: String, fallback: String },
}

/// Shared, lock-free pipeline; clone the `Arc` into each handler.
#[derive(Debug, Clone)]
pub struct AdvisorPipeline {
    retriever: Retriever,
    prompts: PromptBuilder,
    generator: Option<ResponseGenerator>,
    fallback: FallbackAnswerer,
}

impl AdvisorPipeline {
    /// `generator` is `None` when no model is configured; every answer is then a fallback.
    pub fn new(
        retriever: Retriever,
        prompts: PromptBuilder,
        generator: Option<ResponseGenerator>,
    ) -> Self {
        Self {
            retriever,
            prompts,
            generator,
            fallback: FallbackAnswerer::new(),
        }
    }

    pub fn model_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        self.retriever.store()
    }

    pub async fn respond(&self, request: &ChatRequest) -> Result<PipelineAnswer, PipelineError> {
        let question = request.message.trim();
        if question.is_empty() {
            return Err(PipelineError::EmptyMessage);
        }

        let fragments = self.retriever.retrieve(question, &request.history);
        debug!(
            fragments = fragments.len(),
            history = request.history.len(),
            "retrieved"
        );

        let Some(generator) = &self.generator else {
            debug!("no model configured");
            return Ok(self.fallback_answer(question, fragments));
        };

        let prompt = self.prompts.build(question, &fragments, &request.history);
        debug!(messages = prompt.len(), "prompt built");

        match generator.generate(&prompt).await {
            Ok(generation) => {
                debug!(model = %generation.model, "generated");
                Ok(PipelineAnswer {
                    response: generation.text,
                    source: AnswerSource::Generated,
                    fragments,
                })
            }
            Err(GenerationError::InvalidRequest(message)) => {
                error!(
                    provider = generator.provider_name(),
                    error = %message,
                    "model rejected the prompt; this is a prompt-building bug"
                );
                let fallback = self.fallback.answer(question, &fragments);
                Err(PipelineError::InvalidRequest { message, fallback })
            }
            Err(err) => {
                warn!(
                    provider = generator.provider_name(),
                    kind = err.kind(),
                    error = %err,
                    "model call failed, answering from the knowledge base"
                );
                Ok(self.fallback_answer(question, fragments))
            }
        }
    }

    fn fallback_answer(&self, question: &str, fragments: Vec<Fragment>) -> PipelineAnswer {
        PipelineAnswer {
            response: self.fallback.answer(question, &fragments),
            source: AnswerSource::Fallback,
            fragments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::RetrievalSettings;

    fn pipeline() -> AdvisorPipeline {
        let store = KnowledgeStore::from_toml_str(
            "[topics.admissions]\napplication_fee = \"$65\"\n",
        )
        .unwrap();
        AdvisorPipeline::new(
            Retriever::new(Arc::new(store), RetrievalSettings::default()),
            PromptBuilder::with_instructions("Be helpful.", 6),
            None,
        )
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let err = pipeline()
            .respond(&ChatRequest::new("   \n"))
            .await
            .unwrap_err();
        assert_eq!(err, PipelineError::EmptyMessage);
    }

    #[tokio::test]
    async fn test_without_model_answers_from_knowledge() {
        let pipeline = pipeline();
        assert!(!pipeline.model_enabled());

        let answer = pipeline
            .respond(&ChatRequest::new("What is the application fee?"))
            .await
            .unwrap();
        assert_eq!(answer.source, AnswerSource::Fallback);
        assert!(answer.response.contains("$65"));
        assert_eq!(answer.fragments.len(), 1);
    }

    #[test]
    fn test_pipeline_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdvisorPipeline>();
    }
}
