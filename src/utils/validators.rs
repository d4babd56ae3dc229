//! Configuration validation utilities
//!
//! This module provides centralized validation logic for all configuration-related
//! validation rules, promoting separation of concerns and improved testability.

use crate::config::{Config, Settings, Template};
use anyhow::anyhow;
use std::collections::HashSet;
use std::path::Path;

/// Enumeration of possible validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Template name is empty
    EmptyTemplateName(String),
    /// Template URL is empty
    EmptyTemplateUrl(String),
    /// Template URL format is invalid
    InvalidTemplateUrl(String, String),
    /// Template ref is empty
    EmptyTemplateRef(String),
    /// Duplicate template names found
    DuplicateTemplateName(String),
    /// Submodule depth must be at least one
    InvalidSubmoduleDepth(u32),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyTemplateName(url) => {
                write!(f, "Template name cannot be empty (url: '{}')", url)
            }
            ValidationError::EmptyTemplateUrl(name) => {
                write!(f, "Template '{}' URL cannot be empty", name)
            }
            ValidationError::InvalidTemplateUrl(name, url) => {
                write!(f, "Template '{}' has invalid URL: '{}'", name, url)
            }
            ValidationError::EmptyTemplateRef(name) => {
                write!(f, "Template '{}' ref cannot be empty", name)
            }
            ValidationError::DuplicateTemplateName(name) => {
                write!(f, "Duplicate template name: '{}'", name)
            }
            ValidationError::InvalidSubmoduleDepth(depth) => {
                write!(f, "Submodule depth must be at least 1, got {}", depth)
            }
        }
    }
}

/// Validates a complete configuration object
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(mut settings_errors) = validate_settings(&config.settings) {
        errors.append(&mut settings_errors);
    }

    if let Err(mut template_errors) = validate_templates(&config.templates) {
        errors.append(&mut template_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    if settings.submodule_depth == 0 {
        return Err(vec![ValidationError::InvalidSubmoduleDepth(
            settings.submodule_depth,
        )]);
    }
    Ok(())
}

/// Validates a list of templates
///
/// Checks for duplicate names and validates each individual template.
pub fn validate_templates(templates: &[Template]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for template in templates {
        if !names.insert(&template.name) {
            errors.push(ValidationError::DuplicateTemplateName(
                template.name.clone(),
            ));
        }
    }

    for template in templates {
        if let Err(mut template_errors) = validate_template(template) {
            errors.append(&mut template_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a single template
pub fn validate_template(template: &Template) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if template.name.trim().is_empty() {
        errors.push(ValidationError::EmptyTemplateName(template.url.clone()));
    }

    if template.url.trim().is_empty() {
        errors.push(ValidationError::EmptyTemplateUrl(template.name.clone()));
    } else if !is_valid_repository_url(&template.url) {
        errors.push(ValidationError::InvalidTemplateUrl(
            template.name.clone(),
            template.url.clone(),
        ));
    }

    if template.reference.trim().is_empty() {
        errors.push(ValidationError::EmptyTemplateRef(template.name.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check if a repository URL is something git can clone
///
/// Accepts SSH, HTTPS, HTTP, `ssh://`, `file://` and absolute local paths.
pub fn is_valid_repository_url(url: &str) -> bool {
    const SCHEMES: &[&str] = &["git@", "https://", "http://", "ssh://", "file://"];
    SCHEMES.iter().any(|scheme| url.starts_with(scheme)) || Path::new(url).is_absolute()
}

/// Converts validation errors to a user-friendly anyhow error
pub fn validation_errors_to_anyhow(errors: Vec<ValidationError>) -> anyhow::Error {
    let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    anyhow!("Validation errors: {}", error_messages.join("; "))
}
