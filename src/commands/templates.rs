//! Templates command implementation

use super::{Command, CommandContext};
use crate::config::Template;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use serde::Serialize;

/// Output format for a template in JSON mode
#[derive(Debug, Serialize, PartialEq)]
struct TemplateOutput<'a> {
    name: &'a str,
    url: &'a str,
    #[serde(rename = "ref")]
    reference: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl<'a> From<&'a Template> for TemplateOutput<'a> {
    fn from(template: &'a Template) -> Self {
        Self {
            name: &template.name,
            url: &template.url,
            reference: &template.reference,
            description: template.description.as_deref(),
        }
    }
}

/// Lists the configured templates
pub struct ListTemplatesCommand {
    /// Output in JSON format
    pub json: bool,
}

impl ListTemplatesCommand {
    fn render_json(templates: &[Template]) -> Result<String> {
        let output: Vec<TemplateOutput> = templates.iter().map(TemplateOutput::from).collect();
        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[async_trait]
impl Command for ListTemplatesCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let templates = &context.config.templates;

        if self.json {
            println!("{}", Self::render_json(templates)?);
            return Ok(());
        }

        if templates.is_empty() {
            println!("{}", "No templates configured".yellow());
            return Ok(());
        }

        println!(
            "{}",
            format!("Found {} templates", templates.len()).green()
        );
        println!();

        for template in templates {
            println!("{} {}", "•".blue(), template.name.bold());
            println!("  URL: {}", template.url);
            println!("  Ref: {}", template.reference.cyan());
            if let Some(description) = &template.description {
                println!("  {}", description);
            }
            println!();
        }

        Ok(())
    }
}
