pub mod openai_compatible;
pub mod provider;

pub use provider::{
    Provider, ProviderError, ProviderRequest, ProviderResponse, ProviderUsage, extract_text,
};
