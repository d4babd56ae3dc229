//! Streaming parser for git's clone and submodule progress output
//!
//! git writes its progress to stderr as loosely structured text. The
//! parser classifies each line against three patterns, in priority order:
//!
//! 1. `Submodule '<name>' (<url>) registered for path '<path>'`
//! 2. `Cloning into '<path>'...`
//! 3. `Receiving objects: <n>%`
//!
//! and turns them into [`CloneEvent`]s. Anything else is ignored.
//!
//! Between lines the parser keeps which module is currently being cloned
//! ([`ScanState`]) and every submodule declared so far, keyed by its path
//! under the destination. A `Cloning into` line is made relative to the
//! destination and looked up there, so siblings declared under different
//! directories keep their own scope. A clone nobody declared is attributed
//! to the top-level scope under its full relative path.

use super::events::CloneEvent;
use crate::error::ParseError;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

static SUBMODULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Submodule '(.+?)' \((.*)\) registered for path '(.+)'").expect("valid regex")
});

static CLONING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Cloning into '(.+)'\.\.\.").expect("valid regex"));

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Receiving objects:\s*([^%\s]*)%").expect("valid regex"));

/// Which module the parser is currently attributing progress to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// No `Cloning into` line seen yet in this stream
    Idle,
    /// A module clone has started and has not been closed out
    InModule { parent: String, module: String },
}

/// Line classifier and state machine for one phase's diagnostic stream
#[derive(Debug)]
pub struct CloneParser {
    destination: String,
    reference: String,
    declared: HashMap<String, (String, String)>,
    state: ScanState,
}

impl CloneParser {
    /// Create a parser for a clone rooted at `destination` targeting `reference`
    pub fn new(destination: impl AsRef<Path>, reference: &str) -> Self {
        let destination = destination.as_ref().to_string_lossy();
        Self {
            destination: destination.trim_end_matches('/').to_string(),
            reference: reference.to_string(),
            declared: HashMap::new(),
            state: ScanState::Idle,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Read `reader` to EOF, emitting events as lines arrive
    ///
    /// git redraws progress with carriage returns, so every `\r`-separated
    /// segment of a line is classified on its own. A read failure aborts the
    /// scan without attempting to resynchronise.
    pub async fn scan<R, F>(&mut self, mut reader: R, mut emit: F) -> Result<(), ParseError>
    where
        R: AsyncBufRead + Unpin,
        F: FnMut(CloneEvent),
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(ParseError::Scan)?;
            if read == 0 {
                return Ok(());
            }

            let chunk = String::from_utf8_lossy(&buf);
            for segment in chunk.split(['\r', '\n']) {
                if !segment.trim().is_empty() {
                    self.parse_line(segment, &mut emit)?;
                }
            }
        }
    }

    /// Classify one line and apply its transition
    pub fn parse_line<F>(&mut self, line: &str, emit: &mut F) -> Result<(), ParseError>
    where
        F: FnMut(CloneEvent),
    {
        if let Some(caps) = SUBMODULE_RE.captures(line) {
            self.on_submodule(&caps[1], &caps[2], &caps[3], emit);
        } else if let Some(caps) = CLONING_RE.captures(line) {
            self.on_cloning_into(&caps[1], emit);
        } else if let Some(caps) = PERCENT_RE.captures(line) {
            let percent = parse_percent(line, &caps[1])?;
            let (parent, module) = self.current_module();
            emit(CloneEvent::progress(parent, module, percent, &self.reference));
        }
        Ok(())
    }

    fn on_submodule<F>(&mut self, name: &str, url: &str, path: &str, emit: &mut F)
    where
        F: FnMut(CloneEvent),
    {
        let path = path.trim_matches('/');
        let parent = parent_scope(path, name);
        let module = path.strip_prefix(parent.as_str()).unwrap_or(path);
        emit(CloneEvent::discovered(
            &parent,
            module,
            name,
            url,
            &self.reference,
        ));
        self.declared
            .insert(path.to_string(), (parent.clone(), module.to_string()));
    }

    fn on_cloning_into<F>(&mut self, path: &str, emit: &mut F)
    where
        F: FnMut(CloneEvent),
    {
        if let ScanState::InModule { parent, module } = &self.state {
            emit(CloneEvent::progress(parent, module, 100, &self.reference));
        }

        let relative = self.relative_to_destination(path);
        let (parent, module) = self
            .declared
            .get(relative)
            .cloned()
            .unwrap_or_else(|| (String::new(), relative.to_string()));

        emit(CloneEvent::clone_start(&parent, &module, &self.reference));
        emit(CloneEvent::progress(&parent, &module, 0, &self.reference));
        self.state = ScanState::InModule { parent, module };
    }

    /// Path of an announced clone relative to the destination root
    fn relative_to_destination<'a>(&self, path: &'a str) -> &'a str {
        let path = path.trim_end_matches('/');
        match path.strip_prefix(self.destination.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
            _ => path.trim_start_matches('/'),
        }
    }

    fn current_module(&self) -> (&str, &str) {
        match &self.state {
            ScanState::Idle => ("", ""),
            ScanState::InModule { parent, module } => (parent, module),
        }
    }
}

/// Scope a submodule was declared under: its path minus the name suffix
///
/// When the declared name is not a suffix of the path (submodules may be
/// renamed), the directory portion of the path is used instead.
fn parent_scope(path: &str, name: &str) -> String {
    if let Some(parent) = path.strip_suffix(name)
        && (parent.is_empty() || parent.ends_with('/'))
    {
        return parent.to_string();
    }
    match path.rfind('/') {
        Some(idx) => path[..=idx].to_string(),
        None => String::new(),
    }
}

fn parse_percent(line: &str, value: &str) -> Result<u8, ParseError> {
    match value.parse::<u8>() {
        Ok(percent) if percent <= 100 => Ok(percent),
        _ => Err(ParseError::InvalidPercent {
            line: line.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::events::CloneEventKind;

    fn parse_all(parser: &mut CloneParser, lines: &[&str]) -> Vec<CloneEvent> {
        let mut events = Vec::new();
        for line in lines {
            parser
                .parse_line(line, &mut |event| events.push(event))
                .unwrap();
        }
        events
    }

    #[test]
    fn test_parent_scope() {
        assert_eq!(parent_scope("lib/bar", "bar"), "lib/");
        assert_eq!(parent_scope("bar", "bar"), "");
        assert_eq!(parent_scope("vendor/lib/bar", "lib/bar"), "vendor/");
        assert_eq!(parent_scope("vendor/thing", "renamed"), "vendor/");
        assert_eq!(parent_scope("thing", "renamed"), "");
        // A name that only matches part of the last segment is not a suffix
        assert_eq!(parent_scope("lib/foobar", "bar"), "lib/");
    }

    #[test]
    fn test_parse_percent_bounds() {
        assert_eq!(parse_percent("l", "0").unwrap(), 0);
        assert_eq!(parse_percent("l", "100").unwrap(), 100);
        assert!(parse_percent("l", "101").is_err());
        assert!(parse_percent("l", "4x").is_err());
        assert!(parse_percent("l", "").is_err());
    }

    #[test]
    fn test_unrecognised_lines_are_ignored() {
        let mut parser = CloneParser::new("/tmp/foo", "main");
        let events = parse_all(
            &mut parser,
            &[
                "remote: Enumerating objects: 50, done.",
                "Resolving deltas: 100% (10/10), done.",
                "Submodule path 'lib/bar': checked out 'abc123'",
            ],
        );
        assert!(events.is_empty());
        assert_eq!(parser.state(), &ScanState::Idle);
    }

    #[test]
    fn test_progress_before_any_module_is_top_level() {
        let mut parser = CloneParser::new("/tmp/foo", "main");
        let events = parse_all(&mut parser, &["Receiving objects:  42% (21/50)"]);
        assert_eq!(events, vec![CloneEvent::progress("", "", 42, "main")]);
    }

    #[test]
    fn test_cloning_into_destination_is_top_level() {
        let mut parser = CloneParser::new("dest", "main");
        let events = parse_all(&mut parser, &["Cloning into 'dest'..."]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, CloneEventKind::SubmoduleCloneStart);
        assert_eq!(events[0].module, "");
        assert_eq!(events[1], CloneEvent::progress("", "", 0, "main"));
    }

    #[test]
    fn test_new_module_closes_previous_one() {
        let mut parser = CloneParser::new("/d", "main");
        let events = parse_all(
            &mut parser,
            &[
                "Submodule 'a' (https://example.com/a.git) registered for path 'a'",
                "Submodule 'b' (https://example.com/b.git) registered for path 'b'",
                "Cloning into '/d/a'...",
                "Receiving objects:  50% (1/2)",
                "Cloning into '/d/b'...",
            ],
        );
        let kinds: Vec<_> = events.iter().map(|e| (e.kind, e.module.as_str(), e.progress)).collect();
        assert_eq!(
            kinds,
            vec![
                (CloneEventKind::SubmoduleDiscovered, "a", 0),
                (CloneEventKind::SubmoduleDiscovered, "b", 0),
                (CloneEventKind::SubmoduleCloneStart, "a", 0),
                (CloneEventKind::Progress, "a", 0),
                (CloneEventKind::Progress, "a", 50),
                (CloneEventKind::Progress, "a", 100),
                (CloneEventKind::SubmoduleCloneStart, "b", 0),
                (CloneEventKind::Progress, "b", 0),
            ]
        );
    }

    #[test]
    fn test_nested_submodule_keeps_previous_scope_on_close() {
        let mut parser = CloneParser::new("/d", "main");
        let events = parse_all(
            &mut parser,
            &[
                "Submodule 'a' (https://example.com/a.git) registered for path 'a'",
                "Cloning into '/d/a'...",
                "Submodule 'x' (https://example.com/x.git) registered for path 'a/x'",
                "Cloning into '/d/a/x'...",
            ],
        );

        let close = &events[4];
        assert_eq!(close.kind, CloneEventKind::Progress);
        assert_eq!((close.parent.as_str(), close.module.as_str()), ("", "a"));
        assert_eq!(close.progress, 100);

        let start = &events[5];
        assert_eq!(start.kind, CloneEventKind::SubmoduleCloneStart);
        assert_eq!((start.parent.as_str(), start.module.as_str()), ("a/", "x"));
        assert_eq!(start.module_path(), "a/x");
        assert_eq!(
            parser.state(),
            &ScanState::InModule {
                parent: "a/".to_string(),
                module: "x".to_string()
            }
        );
    }

    #[test]
    fn test_siblings_in_different_directories_keep_their_scope() {
        let mut parser = CloneParser::new("/d", "main");
        let events = parse_all(
            &mut parser,
            &[
                "Submodule 'a' (https://example.com/a.git) registered for path 'lib/a'",
                "Submodule 'b' (https://example.com/b.git) registered for path 'ext/b'",
                "Cloning into '/d/lib/a'...",
                "Cloning into '/d/ext/b'...",
            ],
        );

        let starts: Vec<_> = events
            .iter()
            .filter(|e| e.kind == CloneEventKind::SubmoduleCloneStart)
            .map(|e| (e.parent.as_str(), e.module.as_str()))
            .collect();
        assert_eq!(starts, vec![("lib/", "a"), ("ext/", "b")]);
    }

    #[test]
    fn test_destination_prefix_must_end_at_a_separator() {
        let parser = CloneParser::new("/d", "main");
        assert_eq!(parser.relative_to_destination("/d/lib/a"), "lib/a");
        assert_eq!(parser.relative_to_destination("/d"), "");
        assert_eq!(parser.relative_to_destination("/dx/lib"), "dx/lib");
    }

    #[test]
    fn test_malformed_percentage_is_an_error() {
        let mut parser = CloneParser::new("/d", "main");
        let result = parser.parse_line("Receiving objects: abc% (1/2)", &mut |_| {});
        match result {
            Err(ParseError::InvalidPercent { value, .. }) => assert_eq!(value, "abc"),
            other => panic!("expected InvalidPercent, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scan_splits_carriage_returns() {
        let input: &[u8] =
            b"Receiving objects:  10% (1/10)\rReceiving objects:  20% (2/10)\rReceiving objects: 100% (10/10), done.\n";
        let mut parser = CloneParser::new("/d", "main");
        let mut percents = Vec::new();
        parser
            .scan(input, |event| percents.push(event.progress))
            .await
            .unwrap();
        assert_eq!(percents, vec![10, 20, 100]);
    }
}
