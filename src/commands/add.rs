//! Add command implementation

use super::{Command, CommandContext};
use crate::config::Template;
use crate::utils::ensure_directory_exists;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use std::path::PathBuf;

/// Register a template and save the configuration back to `config_path`
pub struct AddTemplateCommand {
    pub name: String,
    pub url: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub config_path: PathBuf,
}

impl AddTemplateCommand {
    fn template(&self) -> Template {
        let mut template = Template::new(self.name.clone(), self.url.clone());
        if let Some(reference) = &self.reference {
            template = template.with_ref(reference.clone());
        }
        if let Some(description) = &self.description {
            template = template.with_description(description.clone());
        }
        template
    }
}

#[async_trait]
impl Command for AddTemplateCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let mut config = context.config.clone();
        let template = self.template();
        let reference = template.reference.clone();
        config.add_template(template)?;

        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_directory_exists(parent)?;
        }
        config.save(&self.config_path)?;

        println!(
            "{}",
            format!(
                "Template '{}' ({}) added to '{}'",
                self.name,
                reference,
                self.config_path.display()
            )
            .green()
        );
        Ok(())
    }
}
