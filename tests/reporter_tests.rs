//! Progress reporter integration tests

mod support;

use scaffold::git::{CloneEvent, CloneParser};
use scaffold::progress::{CloneReporter, Outcome, ProgressReporter};
use support::{RecordingTracker, TrackerCall};

fn reporter() -> ProgressReporter<RecordingTracker> {
    ProgressReporter::new(RecordingTracker::default(), "app")
}

/// Feed git output through the parser straight into the reporter
async fn replay(reporter: &mut ProgressReporter<RecordingTracker>, destination: &str, lines: &[&str]) {
    let input = lines.join("\n");
    let mut parser = CloneParser::new(destination, "main");
    parser
        .scan(input.as_bytes(), |event| reporter.report(&event))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_discoveries_are_flushed_once_per_parent() {
    let mut reporter = reporter();
    replay(
        &mut reporter,
        "/w",
        &[
            "Cloning into '/w'...",
            "Receiving objects: 100% (9/9)",
            "Submodule 'a' (https://example.com/a.git) registered for path 'deps/a'",
            "Submodule 'b' (https://example.com/b.git) registered for path 'deps/b'",
            "Submodule 'c' (https://example.com/c.git) registered for path 'deps/c'",
            "Cloning into '/w/deps/a'...",
            "Receiving objects:  50% (1/2)",
            "Cloning into '/w/deps/b'...",
            "Cloning into '/w/deps/c'...",
        ],
    )
    .await;

    let tracker = reporter.tracker();
    assert_eq!(tracker.clears(), 1);

    // Rows for every sibling exist from the moment the first one starts
    let clear_at = tracker
        .calls
        .iter()
        .position(|call| *call == TrackerCall::Clear)
        .unwrap();
    let replayed: Vec<&TrackerCall> = tracker.calls[clear_at + 1..clear_at + 5].iter().collect();
    assert_eq!(
        replayed,
        vec![
            &TrackerCall::Set("app".to_string(), 100),
            &TrackerCall::Set("deps/a".to_string(), 0),
            &TrackerCall::Set("deps/b".to_string(), 0),
            &TrackerCall::Set("deps/c".to_string(), 0),
        ]
    );

    let ids: Vec<&str> = tracker.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["app", "deps/a", "deps/b", "deps/c"]);
    assert_eq!(tracker.rows[1].percent, 100);
}

#[tokio::test]
async fn test_queued_rows_are_labelled_until_they_start() {
    let mut reporter = reporter();
    reporter.report(&CloneEvent::discovered("deps/", "a", "alpha", "https://example.com/a.git", "v2"));
    reporter.report(&CloneEvent::discovered("deps/", "b", "beta", "https://example.com/b.git", "v2"));
    reporter.report(&CloneEvent::clone_start("deps/", "a", "v2"));

    let rows = reporter.tracker().rows.clone();
    assert_eq!(rows[0].label, "alpha · Cloning from ref: v2");
    assert_eq!(rows[1].label, "beta (queued) · Cloning from ref: v2");

    reporter.report(&CloneEvent::clone_start("deps/", "b", "v2"));
    let rows = reporter.tracker().rows.clone();
    assert_eq!(rows[1].label, "beta · Cloning from ref: v2");
    assert!(rows.iter().all(|row| row.label.contains("Cloning from ref: ")));
}

#[tokio::test]
async fn test_each_nesting_level_is_flushed_separately() {
    let mut reporter = reporter();
    replay(
        &mut reporter,
        "/w",
        &[
            "Submodule 'core' (https://example.com/core.git) registered for path 'vendor/core'",
            "Cloning into '/w/vendor/core'...",
            "Submodule 'tools' (https://example.com/tools.git) registered for path 'vendor/core/tools'",
            "Submodule 'docs' (https://example.com/docs.git) registered for path 'vendor/core/docs'",
            "Cloning into '/w/vendor/core/tools'...",
            "Cloning into '/w/vendor/core/docs'...",
        ],
    )
    .await;

    let tracker = reporter.tracker();
    assert_eq!(tracker.clears(), 2);
    let ids: Vec<&str> = tracker.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["vendor/core", "vendor/core/tools", "vendor/core/docs"]
    );
}

#[tokio::test]
async fn test_sibling_directories_are_each_flushed() {
    let declarations = [
        "Submodule 'a' (https://example.com/a.git) registered for path 'lib/a'",
        "Submodule 'b' (https://example.com/b.git) registered for path 'ext/b'",
    ];

    let mut first_only = reporter();
    let mut lines = declarations.to_vec();
    lines.push("Cloning into '/d/lib/a'...");
    replay(&mut first_only, "/d", &lines).await;

    let ids: Vec<&str> = first_only.tracker().rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["lib/a"]);

    let mut both = reporter();
    lines.push("Receiving objects: 100% (4/4)");
    lines.push("Cloning into '/d/ext/b'...");
    replay(&mut both, "/d", &lines).await;

    let tracker = both.tracker();
    assert_eq!(tracker.clears(), 2);
    let ids: Vec<&str> = tracker.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["lib/a", "ext/b"]);
    assert_eq!(tracker.rows[0].percent, 100);
    assert_eq!(tracker.rows[1].label, "b · Cloning from ref: main");
    assert!(tracker.history("ext/b").starts_with(&[0]));
}

#[tokio::test]
async fn test_row_percent_never_decreases() {
    let mut reporter = reporter();
    for percent in [0, 40, 20, 40, 90, 10, 100, 0] {
        reporter.report(&CloneEvent::progress("", "", percent, "main"));
    }

    assert_eq!(reporter.tracker().history("app"), vec![0, 40, 90, 100]);
    assert_eq!(reporter.rows()[0].percent, 100);
}

#[tokio::test]
async fn test_completion_clears_and_ignores_late_events() {
    let mut reporter = reporter();
    reporter.report(&CloneEvent::progress("", "", 30, "main"));
    reporter.report(&CloneEvent::discovered("lib/", "x", "x", "https://example.com/x.git", "main"));
    reporter.report(&CloneEvent::complete("main"));
    reporter.report(&CloneEvent::clone_start("lib/", "x", "main"));
    reporter.report(&CloneEvent::progress("", "", 60, "main"));

    assert_eq!(reporter.outcome(), Some(Outcome::Complete));
    let tracker = reporter.into_tracker();
    assert_eq!(tracker.calls.last(), Some(&TrackerCall::Clear));
    assert!(tracker.rows.is_empty());
    assert_eq!(tracker.clears(), 1);
}

#[tokio::test]
async fn test_failure_settles_display() {
    let mut reporter = reporter();
    reporter.report(&CloneEvent::progress("", "", 30, "main"));
    reporter.report(&CloneEvent::failed("main"));
    reporter.report(&CloneEvent::failed("main"));

    assert_eq!(reporter.outcome(), Some(Outcome::Failed));
    assert_eq!(reporter.tracker().clears(), 1);
    assert!(reporter.tracker().rows.is_empty());
}
