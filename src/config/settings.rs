//! Behavioural settings shared by every fetch

use crate::constants::git::DEFAULT_SUBMODULE_DEPTH;
use serde::{Deserialize, Serialize};

/// How clone progress is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Bars on a terminal, plain lines otherwise
    #[default]
    Auto,
    /// Live progress bars
    Bars,
    /// One log line per milestone
    Lines,
    /// No progress output
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stream git's own output instead of progress rows
    pub verbose: bool,
    pub progress: ProgressMode,
    pub submodule_depth: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verbose: false,
            progress: ProgressMode::Auto,
            submodule_depth: DEFAULT_SUBMODULE_DEPTH,
        }
    }
}

impl Settings {
    /// Apply command-line overrides on top of file settings
    pub fn with_overrides(mut self, verbose: bool, progress: Option<ProgressMode>) -> Self {
        self.verbose |= verbose;
        if let Some(progress) = progress {
            self.progress = progress;
        }
        self
    }
}
