//! Fetch command implementation

use super::{Command, CommandContext};
use crate::git::{Logger, repo_short_name};
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Fetch command: clone a ref of an arbitrary repository with its submodules
pub struct FetchCommand {
    pub url: String,
    pub reference: String,
    /// Target directory; defaults to the repository's short name
    pub dir: Option<String>,
}

impl FetchCommand {
    pub fn destination(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| repo_short_name(&self.url))
            .into()
    }
}

#[async_trait]
impl Command for FetchCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let name = repo_short_name(&self.url);
        fetch_into(context, &name, &self.url, &self.reference, &self.destination()).await
    }
}

/// Run one fetch, logging its start and outcome under `name`
///
/// A failed or cancelled fetch is returned as the underlying
/// [`crate::FetchError`] so callers can downcast it.
pub(crate) async fn fetch_into(
    context: &CommandContext,
    name: &str,
    url: &str,
    reference: &str,
    destination: &Path,
) -> Result<()> {
    let logger = Logger;
    logger.info(
        name,
        &format!("Fetching ref '{}' into {}", reference, destination.display()),
    );

    match context.fetcher().fetch(url, reference, destination).await {
        Ok(()) => {
            logger.success(name, "Done");
            Ok(())
        }
        Err(error) if error.is_cancelled() => {
            logger.warn(name, "Fetch cancelled");
            Err(error.into())
        }
        Err(error) => {
            logger.error(name, &format!("Fetch failed: {error}"));
            Err(error.into())
        }
    }
}
