//! Common test support utilities and fixtures
//!
//! This module provides shared functionality to reduce code duplication
//! across integration and E2E tests.

#![allow(dead_code)]

use scaffold::git::CloneEvent;
use scaffold::progress::{CloneReporter, ProgressRow, ProgressTracker};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Command;
use std::task::{Context, Poll};
use std::{fs, io};
use tempfile::TempDir;
use tokio::io::{AsyncRead, ReadBuf};

/// Result of running a CLI command
#[derive(Debug)]
pub struct CliOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// A test workspace with temporary directory and config management
pub struct Workspace {
    pub root: TempDir,
    pub config_path: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create a new temporary workspace
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let config_path = root.path().join("scaffold.yaml");
        Self { root, config_path }
    }

    /// Write configuration YAML to the workspace
    pub fn write_config(&self, yaml: &str) {
        fs::write(&self.config_path, yaml).expect("Failed to write config");
    }

    /// Get the workspace root path
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Get the config file path as string
    pub fn config_str(&self) -> &str {
        self.config_path.to_str().expect("Config path not UTF-8")
    }
}

/// Run the scaffold CLI with given arguments
pub fn run_cli(args: &[&str], cwd: Option<&Path>) -> CliOutput {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scaffold"));
    cmd.args(args).env_remove("SCAFFOLD_CONFIG");

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().expect("Failed to execute scaffold binary");

    CliOutput {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Reporter that records every event it receives
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<CloneEvent>,
}

impl CloneReporter for Recorder {
    fn report(&mut self, event: &CloneEvent) {
        self.events.push(event.clone());
    }
}

/// Tracker call, in the order the reporter made them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    Set(String, u8),
    Render,
    Clear,
}

/// Tracker that keeps rows in memory and logs each call
#[derive(Debug, Default)]
pub struct RecordingTracker {
    pub rows: Vec<ProgressRow>,
    pub calls: Vec<TrackerCall>,
}

impl RecordingTracker {
    pub fn clears(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| **call == TrackerCall::Clear)
            .count()
    }

    /// Every percent set on `id`, in order
    pub fn history(&self, id: &str) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                TrackerCall::Set(row, percent) if row == id => Some(*percent),
                _ => None,
            })
            .collect()
    }
}

impl ProgressTracker for RecordingTracker {
    fn set(&mut self, id: &str, percent: u8, label: &str) {
        self.calls.push(TrackerCall::Set(id.to_string(), percent));
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.percent = percent;
                row.label = label.to_string();
            }
            None => self.rows.push(ProgressRow {
                id: id.to_string(),
                percent,
                label: label.to_string(),
            }),
        }
    }

    fn render(&mut self) {
        self.calls.push(TrackerCall::Render);
    }

    fn clear(&mut self) {
        self.calls.push(TrackerCall::Clear);
        self.rows.clear();
    }

    fn rows(&self) -> Vec<ProgressRow> {
        self.rows.clone()
    }
}

/// Reader whose every read fails
pub struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "stream closed",
        )))
    }
}

/// Whether a usable git binary is on PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> io::Result<()> {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Test User",
            "-c",
            "user.email=test@example.com",
            "-c",
            "protocol.file.allow=always",
            "-c",
            "init.defaultBranch=main",
        ])
        .args(args)
        .current_dir(dir)
        .output()?;
    if output.status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        )))
    }
}

/// Initialize a git repository with one committed file on `main`
pub fn init_git_repo(path: &Path, file: &str) -> io::Result<()> {
    fs::create_dir_all(path)?;
    git(path, &["init", "--quiet"])?;
    fs::write(path.join(file), format!("# {file}\n"))?;
    git(path, &["add", "."])?;
    git(path, &["commit", "--quiet", "-m", "Initial commit"])?;
    Ok(())
}

/// Create a tag at the current commit of `path`
pub fn tag(path: &Path, name: &str) -> io::Result<()> {
    git(path, &["tag", name])
}

/// Commit another file on top of the current branch
pub fn commit_file(path: &Path, file: &str) -> io::Result<()> {
    fs::write(path.join(file), format!("# {file}\n"))?;
    git(path, &["add", "."])?;
    git(path, &["commit", "--quiet", "-m", &format!("Add {file}")])
}

/// Register `submodule` at `sub_path` inside `parent` and commit it
pub fn add_submodule(parent: &Path, submodule: &Path, sub_path: &str) -> io::Result<()> {
    let url = submodule.to_string_lossy().into_owned();
    git(parent, &["submodule", "add", "--quiet", &url, sub_path])?;
    git(parent, &["commit", "--quiet", "-m", &format!("Add {sub_path}")])
}
