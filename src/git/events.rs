//! Lifecycle events produced while cloning a repository and its submodules

/// What kind of lifecycle fact a [`CloneEvent`] records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneEventKind {
    SubmoduleDiscovered,
    SubmoduleCloneStart,
    Progress,
    CloneComplete,
    CloneFailed,
}

/// One observed lifecycle fact
///
/// Events are delivered in the order they were produced. For any module,
/// discovery precedes start, start precedes progress and progress precedes
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneEvent {
    pub kind: CloneEventKind,
    /// Scope under which the submodule was declared; empty for the root scope
    pub parent: String,
    /// Module path relative to `parent`; empty for the top-level repository
    pub module: String,
    /// Declared submodule name (discoveries only)
    pub name: String,
    /// Declared submodule URL (discoveries only)
    pub url: String,
    /// Reference the overall fetch is targeting
    pub reference: String,
    /// 0..=100, meaningful for progress events only
    pub progress: u8,
}

impl CloneEvent {
    fn new(kind: CloneEventKind, reference: &str) -> Self {
        Self {
            kind,
            parent: String::new(),
            module: String::new(),
            name: String::new(),
            url: String::new(),
            reference: reference.to_string(),
            progress: 0,
        }
    }

    pub fn discovered(parent: &str, module: &str, name: &str, url: &str, reference: &str) -> Self {
        Self {
            parent: parent.to_string(),
            module: module.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            ..Self::new(CloneEventKind::SubmoduleDiscovered, reference)
        }
    }

    pub fn clone_start(parent: &str, module: &str, reference: &str) -> Self {
        Self {
            parent: parent.to_string(),
            module: module.to_string(),
            ..Self::new(CloneEventKind::SubmoduleCloneStart, reference)
        }
    }

    pub fn progress(parent: &str, module: &str, percent: u8, reference: &str) -> Self {
        Self {
            parent: parent.to_string(),
            module: module.to_string(),
            progress: percent,
            ..Self::new(CloneEventKind::Progress, reference)
        }
    }

    pub fn complete(reference: &str) -> Self {
        Self::new(CloneEventKind::CloneComplete, reference)
    }

    pub fn failed(reference: &str) -> Self {
        Self::new(CloneEventKind::CloneFailed, reference)
    }

    /// Path of the module relative to the destination root
    ///
    /// Empty for the top-level repository.
    pub fn module_path(&self) -> String {
        if self.module.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.parent, self.module)
        }
    }
}
