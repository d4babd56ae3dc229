//! Common git utilities and shared helpers
//!
//! Console logging for fetch workflows and naming helpers shared by the
//! orchestrator, the reporter and the commands.

use colored::*;

/// Logger for fetch operations with consistent formatting
///
/// Each message is prefixed with the name of the repository (or template)
/// in cyan/bold so interleaved output stays attributable.
///
/// ## Example
///
/// ```rust,no_run
/// use scaffold::git::Logger;
///
/// let logger = Logger::default();
/// logger.info("starter", "Fetching ref main");
/// logger.success("starter", "Done");
/// ```
#[derive(Default, Debug, Clone, Copy)]
pub struct Logger;

impl Logger {
    /// A message prefixed with `name`, as every logger method prints it
    pub fn line(&self, name: &str, msg: &str) -> String {
        format!("{} | {}", name.cyan().bold(), msg)
    }

    pub fn info(&self, name: &str, msg: &str) {
        println!("{}", self.line(name, msg));
    }

    pub fn success(&self, name: &str, msg: &str) {
        println!("{} | {}", name.cyan().bold(), msg.green());
    }

    pub fn warn(&self, name: &str, msg: &str) {
        println!("{} | {}", name.cyan().bold(), msg.yellow());
    }

    pub fn error(&self, name: &str, msg: &str) {
        eprintln!("{} | {}", name.cyan().bold(), msg.red());
    }
}

/// Short identifying name of a repository, derived from its URL
///
/// Drops a trailing `/` and `.git`, then takes the final path segment.
/// SCP-style URLs (`git@host:org/repo.git`) are handled as well.
pub fn repo_short_name(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed
        .rsplit(['/', ':', '\\'])
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(trimmed)
        .to_string()
}
