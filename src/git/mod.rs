//! Git operations using the system git binary
//!
//! This module is organized into sub-modules for the stages of a fetch:
//!
//! ## Sub-modules
//!
//! - [`runner`]: Construction of external commands
//!   - `ProcessRunner` / `ProcessHandle` - build and drive a subprocess
//!   - `SystemRunner` - real processes via tokio
//!   - `ScriptedRunner` - canned output for tests and dry runs
//!
//! - [`parser`]: Turns git's progress text into lifecycle events
//!
//! - [`events`]: The `CloneEvent` model shared by parser and reporter
//!
//! - [`clone`]: Clone, checkout and submodule update sequencing
//!
//! - [`cancel`]: Cancellation threaded through every phase
//!
//! - [`common`]: Shared utilities and helpers
//!   - `Logger` - Consistent console output
//!   - `repo_short_name()` - Name of a repository from its URL

pub mod cancel;
pub mod clone;
pub mod common;
pub mod events;
pub mod parser;
pub mod runner;

pub use cancel::CancelToken;
pub use clone::{CloneOptions, CloneOrchestrator};
pub use common::{Logger, repo_short_name};
pub use events::{CloneEvent, CloneEventKind};
pub use parser::{CloneParser, ScanState};
pub use runner::{
    DiagnosticStream, Invocation, OutputMode, ProcessExit, ProcessHandle, ProcessRunner, Script,
    ScriptedRunner, SystemRunner,
};
