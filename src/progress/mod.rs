//! Progress display for fetches
//!
//! - [`reporter`]: turns clone events into rows
//! - [`tracker`]: the sinks those rows are drawn on

pub mod reporter;
pub mod tracker;

pub use reporter::{CloneReporter, NoopReporter, Outcome, ProgressReporter};
pub use tracker::{LineTracker, ProgressRow, ProgressTracker, TerminalTracker};
