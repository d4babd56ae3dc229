//! Central constants for the scaffold application

/// Default values for Git operations
pub mod git {
    /// Version-control binary every phase shells out to
    pub const BINARY: &str = "git";

    /// Reference fetched when none is given
    pub const DEFAULT_REF: &str = "main";

    /// Depth used when materialising submodules
    pub const DEFAULT_SUBMODULE_DEPTH: u32 = 1;

    /// Locale every git invocation runs under; progress is matched on
    /// git's untranslated messages
    pub const LOCALE_VAR: &str = "LC_ALL";
    pub const LOCALE: &str = "C";

    /// Metadata directory removed when a checkout fails
    pub const METADATA_DIR: &str = ".git";
}

/// Default values for configuration
pub mod config {
    /// Default configuration file name
    pub const DEFAULT_CONFIG_FILE: &str = "scaffold.yaml";

    /// Environment variable that overrides the configuration file path
    pub const CONFIG_ENV_VAR: &str = "SCAFFOLD_CONFIG";
}
