//! Base types and traits for the command pattern

use crate::config::{Config, Settings};
use crate::fetch::Fetcher;
use crate::git::{CancelToken, ProcessRunner, SystemRunner};
use crate::metrics::{FetchMetrics, NoopMetrics};
use anyhow::Result;
use std::sync::Arc;

/// Context passed to all commands containing shared configuration and options
#[derive(Clone)]
pub struct CommandContext {
    /// The loaded configuration
    pub config: Config,
    /// Configuration settings with command-line overrides applied
    pub settings: Settings,
    /// Cancels in-flight fetches (wired to Ctrl-C by the binary)
    pub cancel: CancelToken,
    pub metrics: Arc<dyn FetchMetrics>,
    /// Runs git; replaced by a scripted runner in tests
    pub runner: Arc<dyn ProcessRunner>,
}

impl CommandContext {
    /// Context using the configuration's own settings and no metrics
    pub fn new(config: Config) -> Self {
        Self {
            settings: config.settings,
            config,
            cancel: CancelToken::new(),
            metrics: Arc::new(NoopMetrics),
            runner: Arc::new(SystemRunner),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn FetchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// A fetcher configured from this context
    pub fn fetcher(&self) -> Fetcher {
        Fetcher::from_settings(&self.settings)
            .with_cancel(self.cancel.clone())
            .with_metrics(self.metrics.clone())
            .with_runner(self.runner.clone())
    }
}

/// Trait that all commands must implement
#[async_trait::async_trait]
pub trait Command {
    /// Execute the command with the given context
    async fn execute(&self, context: &CommandContext) -> Result<()>;
}
