//! Clone orchestration: clone, checkout, recursive submodule update
//!
//! A plain clone cannot select an arbitrary ref or SHA, and submodules have
//! to be fetched against the checked-out tree, so materialising a working
//! tree takes three git invocations:
//!
//! 1. `git clone --progress <url> <dir>`
//! 2. `git checkout --quiet <ref>` inside `<dir>`
//! 3. `git submodule update --init --recursive --progress --depth <n>` inside `<dir>`
//!
//! Phases 1 and 3 have their stderr fed through [`CloneParser`] into the
//! reporter while they run. In verbose mode git's own output goes straight
//! to the terminal instead and the reporter only hears about failures.

use super::cancel::CancelToken;
use super::events::CloneEvent;
use super::parser::CloneParser;
use super::runner::{OutputMode, ProcessExit, ProcessHandle, ProcessRunner};
use crate::constants::git::{BINARY, DEFAULT_SUBMODULE_DEPTH, LOCALE, LOCALE_VAR};
use crate::error::{FetchError, Phase};
use crate::progress::CloneReporter;
use crate::utils::{get_exit_code_description, remove_git_metadata};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Knobs for one clone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneOptions {
    /// Stream git's native output instead of parsing it
    pub verbose: bool,
    pub submodule_depth: u32,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            submodule_depth: DEFAULT_SUBMODULE_DEPTH,
        }
    }
}

pub fn clone_args(repo_url: &str, destination: &Path) -> Vec<String> {
    vec![
        "clone".to_string(),
        "--progress".to_string(),
        repo_url.to_string(),
        destination.to_string_lossy().into_owned(),
    ]
}

pub fn checkout_args(reference: &str) -> Vec<String> {
    vec![
        "checkout".to_string(),
        "--quiet".to_string(),
        reference.to_string(),
    ]
}

pub fn submodule_args(depth: u32) -> Vec<String> {
    vec![
        "submodule".to_string(),
        "update".to_string(),
        "--init".to_string(),
        "--recursive".to_string(),
        "--progress".to_string(),
        "--depth".to_string(),
        depth.to_string(),
    ]
}

/// Drives the three clone phases for one repository
pub struct CloneOrchestrator<'a> {
    runner: &'a dyn ProcessRunner,
    reporter: &'a mut dyn CloneReporter,
    cancel: CancelToken,
    options: CloneOptions,
}

impl<'a> CloneOrchestrator<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        reporter: &'a mut dyn CloneReporter,
        cancel: CancelToken,
        options: CloneOptions,
    ) -> Self {
        Self {
            runner,
            reporter,
            cancel,
            options,
        }
    }

    /// Materialise `reference` of `repo_url` with its submodules in `destination`
    ///
    /// Any failure is reported to the reporter as a single `CloneFailed`.
    /// A failed checkout also removes the `.git` directory so no
    /// half-initialised working tree is left behind.
    pub async fn clone_with_submodules(
        &mut self,
        repo_url: &str,
        reference: &str,
        destination: &Path,
    ) -> Result<(), FetchError> {
        let result = self.run_phases(repo_url, reference, destination).await;

        if let Err(error) = &result {
            debug!(error = %error, "Clone failed");
            self.reporter.report(&CloneEvent::failed(reference));
            if matches!(error, FetchError::Checkout { .. })
                && let Err(cleanup) = remove_git_metadata(destination)
            {
                warn!(
                    destination = %destination.display(),
                    error = %cleanup,
                    "Failed to remove git metadata after checkout failure"
                );
            }
        }

        result
    }

    async fn run_phases(
        &mut self,
        repo_url: &str,
        reference: &str,
        destination: &Path,
    ) -> Result<(), FetchError> {
        let verbose = self.options.verbose;

        self.run_streamed(
            Phase::Clone,
            None,
            clone_args(repo_url, destination),
            destination,
            reference,
        )
        .await?;

        self.checkout(reference, destination)
            .await
            .map_err(|source| FetchError::Checkout {
                reference: reference.to_string(),
                source: Box::new(source),
            })?;

        // git does not always print a final line for very small repositories
        if !verbose {
            self.reporter
                .report(&CloneEvent::progress("", "", 100, reference));
        }

        let root = parse_root(destination);
        self.run_streamed(
            Phase::SubmoduleUpdate,
            Some(destination),
            submodule_args(self.options.submodule_depth),
            &root,
            reference,
        )
        .await?;

        if !verbose {
            self.reporter.report(&CloneEvent::complete(reference));
        }
        Ok(())
    }

    /// Run a phase whose stderr carries progress
    async fn run_streamed(
        &mut self,
        phase: Phase,
        dir: Option<&Path>,
        args: Vec<String>,
        parse_root: &Path,
        reference: &str,
    ) -> Result<(), FetchError> {
        let cancel = self.cancel.clone();
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled { phase });
        }

        debug!(%phase, ?args, "Starting git");
        let mut process = self.runner.command(dir, BINARY, &args);
        process.set_env(LOCALE_VAR, LOCALE);
        if self.options.verbose {
            process.set_stdout(OutputMode::Inherit);
            process.set_stderr(OutputMode::Inherit);
        } else {
            process.set_stdout(OutputMode::Null);
            process.set_stderr(OutputMode::Piped);
        }
        process
            .start()
            .await
            .map_err(|source| FetchError::Spawn { phase, source })?;

        if !self.options.verbose {
            let Some(stream) = process.take_stderr() else {
                let _ = process.kill().await;
                return Err(FetchError::StreamUnavailable { phase });
            };

            let mut parser = CloneParser::new(parse_root, reference);
            let reporter = &mut *self.reporter;
            let scanned = tokio::select! {
                result = parser.scan(stream, |event| reporter.report(&event)) => Some(result),
                _ = cancel.cancelled() => None,
            };
            match scanned {
                Some(Ok(())) => {}
                Some(Err(source)) => {
                    let _ = process.kill().await;
                    return Err(FetchError::Parse { phase, source });
                }
                None => {
                    let _ = process.kill().await;
                    return Err(FetchError::Cancelled { phase });
                }
            }
        }

        let exit = wait_or_cancel(process.as_mut(), phase, &cancel).await?;
        check_exit(phase, exit)
    }

    async fn checkout(&mut self, reference: &str, destination: &Path) -> Result<(), FetchError> {
        let phase = Phase::Checkout;
        let cancel = self.cancel.clone();
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled { phase });
        }

        debug!(%phase, reference, "Starting git");
        let mut process = self
            .runner
            .command(Some(destination), BINARY, &checkout_args(reference));
        process.set_env(LOCALE_VAR, LOCALE);

        let exit = if self.options.verbose {
            process.set_stdout(OutputMode::Inherit);
            process.set_stderr(OutputMode::Inherit);
            process
                .start()
                .await
                .map_err(|source| FetchError::Spawn { phase, source })?;
            wait_or_cancel(process.as_mut(), phase, &cancel).await?
        } else {
            let output = tokio::select! {
                output = process.combined_output() => Some(output),
                _ = cancel.cancelled() => None,
            };
            let Some(output) = output else {
                let _ = process.kill().await;
                return Err(FetchError::Cancelled { phase });
            };
            let (exit, output) = output.map_err(|source| FetchError::Spawn { phase, source })?;
            if !exit.success() {
                debug!(%phase, output = %String::from_utf8_lossy(&output).trim(), "git output");
            }
            exit
        };

        check_exit(phase, exit)
    }
}

/// Directory submodule clones are announced under
///
/// git prints the real path of the work tree, with `..` and symlinks
/// resolved, so the destination has to be resolved the same way.
fn parse_root(destination: &Path) -> PathBuf {
    std::fs::canonicalize(destination)
        .or_else(|_| std::path::absolute(destination))
        .unwrap_or_else(|_| destination.to_path_buf())
}

async fn wait_or_cancel(
    process: &mut dyn ProcessHandle,
    phase: Phase,
    cancel: &CancelToken,
) -> Result<ProcessExit, FetchError> {
    let waited = tokio::select! {
        status = process.wait() => Some(status),
        _ = cancel.cancelled() => None,
    };
    match waited {
        Some(status) => status.map_err(|source| FetchError::Io { phase, source }),
        None => {
            let _ = process.kill().await;
            Err(FetchError::Cancelled { phase })
        }
    }
}

fn check_exit(phase: Phase, exit: ProcessExit) -> Result<(), FetchError> {
    debug!(%phase, code = exit.code(), "git exited");
    if exit.success() {
        Ok(())
    } else {
        Err(FetchError::Exit {
            phase,
            code: exit.code(),
            description: get_exit_code_description(exit.code()),
        })
    }
}
