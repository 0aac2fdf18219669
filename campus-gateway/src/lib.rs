pub mod chat;
pub mod content;
pub mod deterministic_messages;
pub mod fallback;
pub mod generator;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod server;
pub mod state;

pub use fallback::FallbackAnswerer;
pub use generator::{
    Generation, GenerationError, GenerationResult, GenerationSettings, ResponseGenerator,
};
pub use pipeline::{AdvisorPipeline, AnswerSource, PipelineAnswer, PipelineError};
pub use prompt::{Prompt, PromptBuilder, PromptMessage, PromptRole};
pub use providers::provider::{
    Provider, ProviderError, ProviderRequest, ProviderResponse, ProviderUsage, extract_text,
};
