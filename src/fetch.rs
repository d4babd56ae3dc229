//! The fetch entry point used by the rest of the program
//!
//! [`Fetcher`] wires a process runner, the clone orchestrator, the parser
//! and a progress reporter together, and tells the metrics collaborator
//! when each fetch starts and finishes.

use crate::config::{ProgressMode, Settings};
use crate::error::FetchError;
use crate::git::{CancelToken, CloneEvent, CloneOptions, CloneOrchestrator, ProcessRunner, SystemRunner, repo_short_name};
use crate::metrics::{FetchMetrics, NoopMetrics};
use crate::progress::{CloneReporter, LineTracker, NoopReporter, ProgressReporter, TerminalTracker};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Clones refs of repositories (with submodules) into working trees
pub struct Fetcher {
    runner: Arc<dyn ProcessRunner>,
    metrics: Arc<dyn FetchMetrics>,
    cancel: CancelToken,
    options: CloneOptions,
    progress: ProgressMode,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// A fetcher using the system git binary and no metrics
    pub fn new() -> Self {
        Self {
            runner: Arc::new(SystemRunner),
            metrics: Arc::new(NoopMetrics),
            cancel: CancelToken::new(),
            options: CloneOptions::default(),
            progress: ProgressMode::Auto,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_options(CloneOptions {
                verbose: settings.verbose,
                submodule_depth: settings.submodule_depth,
            })
            .with_progress(settings.progress)
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn FetchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_options(mut self, options: CloneOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_progress(mut self, progress: ProgressMode) -> Self {
        self.progress = progress;
        self
    }

    /// Token that cancels every fetch made by this fetcher
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Progress display that will actually be used
    ///
    /// Verbose output and progress rows are mutually exclusive.
    pub fn effective_progress(&self) -> ProgressMode {
        match self.progress {
            _ if self.options.verbose => ProgressMode::Off,
            ProgressMode::Auto if std::io::stderr().is_terminal() => ProgressMode::Bars,
            ProgressMode::Auto => ProgressMode::Lines,
            mode => mode,
        }
    }

    /// Clone `reference` of `repo_url` with submodules into `destination`,
    /// displaying progress according to the configured mode
    pub async fn fetch(
        &self,
        repo_url: &str,
        reference: &str,
        destination: &Path,
    ) -> Result<(), FetchError> {
        let name = repo_short_name(repo_url);
        match self.effective_progress() {
            ProgressMode::Bars => {
                let mut reporter = ProgressReporter::new(TerminalTracker::new(), &name);
                self.fetch_with_reporter(repo_url, reference, destination, &mut reporter)
                    .await
            }
            ProgressMode::Lines => {
                let mut reporter = ProgressReporter::new(LineTracker::new(), &name);
                self.fetch_with_reporter(repo_url, reference, destination, &mut reporter)
                    .await
            }
            ProgressMode::Off | ProgressMode::Auto => {
                self.fetch_with_reporter(repo_url, reference, destination, &mut NoopReporter)
                    .await
            }
        }
    }

    /// Same as [`Fetcher::fetch`] with a caller-supplied reporter
    pub async fn fetch_with_reporter(
        &self,
        repo_url: &str,
        reference: &str,
        destination: &Path,
        reporter: &mut dyn CloneReporter,
    ) -> Result<(), FetchError> {
        if repo_url.trim().is_empty() {
            reporter.report(&CloneEvent::failed(reference));
            return Err(FetchError::EmptyRepositoryUrl);
        }

        debug!(
            repo_url,
            reference,
            destination = %destination.display(),
            verbose = self.options.verbose,
            "Fetching"
        );
        self.metrics.clone_started(repo_url);

        let result = CloneOrchestrator::new(
            self.runner.as_ref(),
            reporter,
            self.cancel.clone(),
            self.options,
        )
        .clone_with_submodules(repo_url, reference, destination)
        .await;

        self.metrics.clone_finished(repo_url, result.as_ref().err());
        result
    }
}
