//! New command implementation

use super::fetch::fetch_into;
use super::{Command, CommandContext};
use crate::utils::is_empty_or_missing;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::path::PathBuf;

/// New command: scaffold a project from a configured template
pub struct NewCommand {
    pub template: String,
    /// Target directory; defaults to the template repository's short name
    pub dir: Option<String>,
    /// Overrides the template's ref
    pub reference: Option<String>,
}

#[async_trait]
impl Command for NewCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let template = context.config.find_template(&self.template).ok_or_else(|| {
            let available: Vec<&str> = context
                .config
                .templates
                .iter()
                .map(|template| template.name.as_str())
                .collect();
            anyhow!(
                "Template '{}' not found. Available templates: {}",
                self.template,
                if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                }
            )
        })?;

        let destination = PathBuf::from(
            self.dir
                .clone()
                .unwrap_or_else(|| template.default_directory()),
        );
        let is_free = is_empty_or_missing(&destination)
            .with_context(|| format!("Failed to inspect '{}'", destination.display()))?;
        if !is_free {
            return Err(anyhow!(
                "Directory '{}' already exists and is not empty",
                destination.display()
            ));
        }

        let reference = self.reference.as_deref().unwrap_or(&template.reference);
        fetch_into(context, &template.name, &template.url, reference, &destination).await
    }
}
