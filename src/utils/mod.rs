//! Utility modules for common functionality

pub mod exit_codes;
pub mod filesystem;
pub mod validators;

// Re-export commonly used functions
pub use exit_codes::get_exit_code_description;
pub use filesystem::{ensure_directory_exists, is_empty_or_missing, remove_git_metadata};
