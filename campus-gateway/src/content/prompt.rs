use serde::Deserialize;

use super::ContentError;
use crate::content::template::{TemplateVars, render_template};

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub id: String,
    pub vars: Vec<String>,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptFrontMatter {
    pub id: String,
    #[serde(default)]
    pub vars: Option<Vec<String>>,
}

impl PromptTemplate {
    pub fn from_parts(front_matter: PromptFrontMatter, body: String) -> Self {
        Self {
            id: front_matter.id,
            vars: front_matter.vars.unwrap_or_default(),
            body: body.trim().to_string(),
        }
    }

    /// Render the body; every declared var must be supplied.
    pub fn render(&self, vars: &TemplateVars) -> Result<String, ContentError> {
        if let Some(missing) = self.vars.iter().find(|var| !vars.contains_key(*var)) {
            return Err(ContentError::MissingVar(missing.clone()));
        }
        render_template(&self.body, vars)
    }
}
