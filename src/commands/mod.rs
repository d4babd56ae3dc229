//! Command implementations

pub mod add;
pub mod base;
pub mod fetch;
pub mod init;
pub mod new;
pub mod templates;
pub mod validators;

pub use add::AddTemplateCommand;
pub use base::{Command, CommandContext};
pub use fetch::FetchCommand;
pub use init::InitCommand;
pub use new::NewCommand;
pub use templates::ListTemplatesCommand;
