//! Configuration file loading and saving

use super::{Settings, Template};
use crate::constants::config::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use crate::utils::validators;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const BUNDLED_TEMPLATES: &[(&str, &str, &str)] = &[
    (
        "starter",
        "https://github.com/scaffold-templates/starter.git",
        "Minimal project layout",
    ),
    (
        "workspace",
        "https://github.com/scaffold-templates/workspace.git",
        "Multi-package workspace with shared tooling submodules",
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub templates: Vec<Template>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, or fall back to the bundled defaults
    /// when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::bundled())
        }
    }

    /// The configuration shipped with the binary
    pub fn bundled() -> Self {
        Self {
            settings: Settings::default(),
            templates: BUNDLED_TEMPLATES
                .iter()
                .map(|(name, url, description)| {
                    Template::new(name.to_string(), url.to_string())
                        .with_description(description.to_string())
                })
                .collect(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, format!("---\n{yaml}"))
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Get template by name
    pub fn find_template(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.name == name)
    }

    /// Add a template to the configuration
    pub fn add_template(&mut self, template: Template) -> Result<()> {
        if self.find_template(&template.name).is_some() {
            return Err(anyhow::anyhow!(
                "Template '{}' already exists",
                template.name
            ));
        }

        template.validate()?;

        self.templates.push(template);
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        validators::validate_config(self).map_err(validators::validation_errors_to_anyhow)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Resolve the configuration path: explicit flag, then environment, then default
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(str::to_string)
        .or_else(|| {
            std::env::var(CONFIG_ENV_VAR)
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
        .into()
}
