use std::collections::HashMap;

use crate::content::ContentError;
use crate::content::prompt::{PromptFrontMatter, PromptTemplate};
use crate::content::template::{split_front_matter, vars_from_pairs};

/// Prompt files compiled into the binary, keyed by file name.
const BUNDLED_PROMPTS: &[(&str, &str)] = &[(
    "system-base.md",
    include_str!("../../prompts/system-base.md"),
)];

#[derive(Debug, Default)]
pub struct ContentRegistry {
    prompts: HashMap<String, PromptTemplate>,
}

impl ContentRegistry {
    /// Parse the bundled prompts.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_sources(BUNDLED_PROMPTS)
    }

    /// Parse prompt sources given as `(file name, raw text)` pairs.
    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self, ContentError> {
        let mut registry = Self::default();
        for (file_name, raw_text) in sources {
            registry.load_prompt(file_name, raw_text)?;
        }
        Ok(registry)
    }

    pub fn prompt_text(&self, id: &str, vars: &[(&str, &str)]) -> Result<String, ContentError> {
        let template = self.prompt_template(id)?;
        let vars = vars_from_pairs(vars);
        template.render(&vars)
    }

    pub fn prompt_template(&self, id: &str) -> Result<&PromptTemplate, ContentError> {
        self.prompts
            .get(id)
            .ok_or_else(|| ContentError::MissingPrompt(id.to_string()))
    }

    fn load_prompt(&mut self, file_name: &str, raw_text: &str) -> Result<(), ContentError> {
        let id_from_name = file_name.strip_suffix(".md").ok_or_else(|| {
            ContentError::Parse(format!("Prompt file must be markdown: {file_name}"))
        })?;

        let (front_matter, body) = split_front_matter(raw_text)
            .map_err(|e| ContentError::Parse(format!("{file_name}: {e}")))?;
        let front: PromptFrontMatter = toml::from_str(&front_matter)
            .map_err(|e| ContentError::Parse(format!("{file_name}: {e}")))?;
        let template = PromptTemplate::from_parts(front, body);

        if template.id != id_from_name {
            return Err(ContentError::Parse(format!(
                "Template id '{}' does not match filename '{}'",
                template.id, id_from_name
            )));
        }
        if self.prompts.contains_key(&template.id) {
            return Err(ContentError::Duplicate(template.id));
        }

        self.prompts.insert(template.id.clone(), template);
        Ok(())
    }
}
