//! Template repository definition

use crate::constants::git::DEFAULT_REF;
use crate::git::repo_short_name;
use crate::utils::validators;
use anyhow::Result;
use serde::{Deserialize, Serialize};

fn default_ref() -> String {
    DEFAULT_REF.to_string()
}

/// A repository that projects are scaffolded from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub url: String,
    /// Branch, tag or commit to check out
    #[serde(rename = "ref", default = "default_ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Template {
    /// Create a template tracking the default ref
    pub fn new(name: String, url: String) -> Self {
        Self {
            name,
            url,
            reference: default_ref(),
            description: None,
        }
    }

    pub fn with_ref(mut self, reference: String) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    /// Directory name used when no target directory is given
    pub fn default_directory(&self) -> String {
        repo_short_name(&self.url)
    }

    pub fn validate(&self) -> Result<()> {
        validators::validate_template(self).map_err(validators::validation_errors_to_anyhow)
    }
}
