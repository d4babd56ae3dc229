//! Descriptions of how a git phase ended, for fetch error messages

/// Describe the exit status of a git invocation
///
/// git exits with 128 from `die()` on fatal errors and 129 on bad usage.
/// `-1` is what [`crate::git::ProcessExit::code`] reports when git was
/// killed by a signal, as happens on cancellation.
pub fn get_exit_code_description(exit_code: i32) -> &'static str {
    match exit_code {
        0 => "success",
        1 => "git reported a failure",
        126 => "git binary is not executable",
        127 => "git binary not found",
        128 => "fatal git error",
        129 => "invalid git usage",
        130 => "interrupted",
        -1 | 131..=255 => "terminated by signal",
        _ => "error",
    }
}
