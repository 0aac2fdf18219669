mod prompt;
mod registry;
mod template;
pub mod ids;

use thiserror::Error;

pub use prompt::{PromptFrontMatter, PromptTemplate};
pub use registry::ContentRegistry;
pub use template::{TemplateVars, render_template, vars_from_pairs};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content parse error: {0}")]
    Parse(String),
    #[error("missing prompt: {0}")]
    MissingPrompt(String),
    #[error("template error: {0}")]
    TemplateParse(String),
    #[error("missing template variable: {0}")]
    MissingVar(String),
    #[error("duplicate content entry: {0}")]
    Duplicate(String),
}

/// Render a bundled prompt by id.
pub fn prompt_text(id: &str, vars: &[(&str, &str)]) -> Result<String, ContentError> {
    ContentRegistry::builtin()?.prompt_text(id, vars)
}

#[cfg(test)]
mod tests {
    use super::{ContentRegistry, ids};

    #[test]
    fn test_registry_loads_bundled_prompts() {
        let reg = ContentRegistry::builtin().unwrap();
        let prompt = reg.prompt_text(ids::PROMPT_SYSTEM_BASE, &[("institution", "Test U")]);
        assert!(prompt.unwrap().contains("Test U admissions assistant"));
    }
}
