//! Error types for the fetch pipeline
//!
//! The command layer works with `anyhow`, but the pipeline itself returns
//! [`FetchError`] so callers can tell which phase failed and whether the
//! failure was a cancellation.

use std::fmt;
use std::io;
use thiserror::Error;

/// One of the subprocess invocations that together make up a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Clone,
    Checkout,
    SubmoduleUpdate,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Clone => write!(f, "clone"),
            Phase::Checkout => write!(f, "checkout"),
            Phase::SubmoduleUpdate => write!(f, "submodule update"),
        }
    }
}

/// Errors raised while scanning a phase's diagnostic stream
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("scan failed: {0}")]
    Scan(#[source] io::Error),

    #[error("invalid progress percentage '{value}' in line '{line}'")]
    InvalidPercent { line: String, value: String },
}

/// Errors surfaced by [`crate::fetch::Fetcher`] and the clone orchestrator
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("repository URL cannot be empty")]
    EmptyRepositoryUrl,

    #[error("failed to start git {phase}: {source}")]
    Spawn {
        phase: Phase,
        #[source]
        source: io::Error,
    },

    #[error("git {phase} did not expose a diagnostic stream")]
    StreamUnavailable { phase: Phase },

    #[error("failed to parse git {phase} output: {source}")]
    Parse {
        phase: Phase,
        #[source]
        source: ParseError,
    },

    #[error("git {phase} exited with code {code} ({description})")]
    Exit {
        phase: Phase,
        code: i32,
        description: &'static str,
    },

    #[error("failed to wait for git {phase}: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: io::Error,
    },

    #[error("failed to check out ref '{reference}': {source}")]
    Checkout {
        reference: String,
        #[source]
        source: Box<FetchError>,
    },

    #[error("git {phase} was cancelled")]
    Cancelled { phase: Phase },
}

impl FetchError {
    /// Whether this error (or the error it wraps) is a cancellation
    pub fn is_cancelled(&self) -> bool {
        match self {
            FetchError::Cancelled { .. } => true,
            FetchError::Checkout { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// The phase the error originated in, if any
    pub fn phase(&self) -> Option<Phase> {
        match self {
            FetchError::EmptyRepositoryUrl => None,
            FetchError::Checkout { .. } => Some(Phase::Checkout),
            FetchError::Spawn { phase, .. }
            | FetchError::StreamUnavailable { phase }
            | FetchError::Parse { phase, .. }
            | FetchError::Exit { phase, .. }
            | FetchError::Io { phase, .. }
            | FetchError::Cancelled { phase } => Some(*phase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Clone.to_string(), "clone");
        assert_eq!(Phase::Checkout.to_string(), "checkout");
        assert_eq!(Phase::SubmoduleUpdate.to_string(), "submodule update");
    }

    #[test]
    fn test_checkout_error_names_reference() {
        let error = FetchError::Checkout {
            reference: "v1.2.3".to_string(),
            source: Box::new(FetchError::Exit {
                phase: Phase::Checkout,
                code: 1,
                description: "git reported a failure",
            }),
        };
        let message = error.to_string();
        assert!(message.contains("v1.2.3"));
        assert!(message.contains("exited with code 1"));
        assert_eq!(error.phase(), Some(Phase::Checkout));
        assert!(!error.is_cancelled());
    }

    #[test]
    fn test_cancellation_is_distinguished() {
        let cancelled = FetchError::Cancelled {
            phase: Phase::SubmoduleUpdate,
        };
        assert!(cancelled.is_cancelled());

        let wrapped = FetchError::Checkout {
            reference: "main".to_string(),
            source: Box::new(FetchError::Cancelled {
                phase: Phase::Checkout,
            }),
        };
        assert!(wrapped.is_cancelled());

        assert!(!FetchError::EmptyRepositoryUrl.is_cancelled());
        assert_eq!(FetchError::EmptyRepositoryUrl.phase(), None);
    }

    #[test]
    fn test_scan_error_mentions_scan() {
        let error = ParseError::Scan(io::Error::other("boom"));
        assert!(error.to_string().contains("scan"));
    }
}
