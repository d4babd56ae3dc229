//! Init command implementation

use super::{Command, CommandContext};
use crate::config::Config;
use crate::utils::ensure_directory_exists;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use std::path::Path;

/// Init command: write the bundled configuration as a starting point
pub struct InitCommand {
    pub output: String,
    pub overwrite: bool,
}

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, _context: &CommandContext) -> Result<()> {
        let output = Path::new(&self.output);
        if output.exists() && !self.overwrite {
            return Err(anyhow::anyhow!(
                "Output file '{}' already exists. Use --overwrite to replace it.",
                self.output
            ));
        }

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_directory_exists(parent)?;
        }

        let config = Config::bundled();
        config.save(output)?;

        println!(
            "{}",
            format!(
                "Configuration with {} templates saved to '{}'",
                config.templates.len(),
                self.output
            )
            .green()
        );

        Ok(())
    }
}
