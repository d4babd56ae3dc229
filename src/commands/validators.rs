//! Command argument validation utilities
//!
//! This module provides centralized validation logic for command arguments
//! after clap parsing. It handles domain-specific validation rules that
//! go beyond basic argument parsing.

use crate::utils::validators::is_valid_repository_url;
use anyhow::{Result, anyhow};

/// Validation errors for command arguments
#[derive(Debug, PartialEq)]
pub enum CommandValidationError {
    /// Required argument was not provided
    MissingRequired { argument: String },
    /// Invalid argument value
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for CommandValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandValidationError::MissingRequired { argument } => {
                write!(f, "{} is required", argument)
            }
            CommandValidationError::InvalidValue {
                argument,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for {}: {}", value, argument, reason)
            }
        }
    }
}

impl std::error::Error for CommandValidationError {}

/// Convert validation error to anyhow::Error
pub fn validation_error_to_anyhow(error: CommandValidationError) -> anyhow::Error {
    anyhow!(error.to_string())
}

fn invalid(argument: &str, value: &str, reason: &str) -> anyhow::Error {
    validation_error_to_anyhow(CommandValidationError::InvalidValue {
        argument: argument.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    })
}

/// Validate the repository URL passed to `fetch`
pub fn validate_repository_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(validation_error_to_anyhow(
            CommandValidationError::MissingRequired {
                argument: "repository URL".to_string(),
            },
        ));
    }
    if !is_valid_repository_url(url) {
        return Err(invalid(
            "repository URL",
            url,
            "expected git@, https://, http://, ssh://, file:// or an absolute path",
        ));
    }
    Ok(())
}

/// Validate a ref (branch, tag or commit)
///
/// Ensures refs follow basic Git naming conventions
pub fn validate_reference(reference: &str) -> Result<()> {
    if reference.trim().is_empty() {
        return Err(invalid(
            "ref",
            reference,
            "ref cannot be empty or whitespace only",
        ));
    }

    if reference.starts_with('-')
        || reference.ends_with('.')
        || reference.ends_with('/')
        || reference.contains("..")
        || reference.chars().any(char::is_whitespace)
    {
        return Err(invalid("ref", reference, "invalid Git ref format"));
    }
    Ok(())
}

/// Validate the target directory
///
/// Ensures the directory path is not blank when provided
pub fn validate_target_directory(dir: &Option<String>) -> Result<()> {
    if let Some(dir) = dir
        && dir.trim().is_empty()
    {
        return Err(invalid(
            "directory",
            dir,
            "directory cannot be empty or whitespace only",
        ));
    }
    Ok(())
}

/// Validate a template name
pub fn validate_template_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid(
            "template name",
            name,
            "template name cannot be empty or whitespace only",
        ));
    }
    Ok(())
}
