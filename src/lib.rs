//! Scaffold - fetch project templates (and every nested submodule) at a chosen ref

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod git;
pub mod metrics;
pub mod progress;
pub mod utils;

pub type Result<T> = anyhow::Result<T>;

// Re-export commonly used types
pub use commands::{Command, CommandContext};
pub use config::{Config, Settings, Template};
pub use error::{FetchError, ParseError, Phase};
pub use fetch::Fetcher;

