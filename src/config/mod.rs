//! Configuration management module

pub mod loader;
pub mod settings;
pub mod template;

pub use loader::{Config, resolve_config_path};
pub use settings::{ProgressMode, Settings};
pub use template::Template;
