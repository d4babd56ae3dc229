//! Projection of clone events onto progress rows
//!
//! [`ProgressReporter`] keeps one row per module. Rows only move forward:
//! a reading at or below what a row already shows is dropped (regressions
//! are logged at debug level). Submodule discoveries are held back per
//! parent scope and materialised together when the first clone under that
//! scope starts, so rows do not churn while git lists a level's submodules.

use super::tracker::{ProgressRow, ProgressTracker};
use crate::git::events::{CloneEvent, CloneEventKind};
use std::collections::HashMap;
use tracing::debug;

/// Consumer of the clone event stream
pub trait CloneReporter: Send {
    fn report(&mut self, event: &CloneEvent);
}

/// Reporter used when nobody is watching
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl CloneReporter for NoopReporter {
    fn report(&mut self, _event: &CloneEvent) {}
}

/// How the display was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    Failed,
}

#[derive(Debug, Clone)]
struct PendingDiscovery {
    id: String,
    name: String,
    url: String,
}

/// Stateful projector of [`CloneEvent`]s onto a [`ProgressTracker`]
pub struct ProgressReporter<T: ProgressTracker> {
    tracker: T,
    top_level: String,
    rows: Vec<ProgressRow>,
    names: HashMap<String, String>,
    pending: HashMap<String, Vec<PendingDiscovery>>,
    outcome: Option<Outcome>,
}

impl<T: ProgressTracker> ProgressReporter<T> {
    /// `top_level` names the row of the repository being fetched
    pub fn new(tracker: T, top_level: &str) -> Self {
        Self {
            tracker,
            top_level: top_level.to_string(),
            rows: Vec::new(),
            names: HashMap::new(),
            pending: HashMap::new(),
            outcome: None,
        }
    }

    pub fn rows(&self) -> &[ProgressRow] {
        &self.rows
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn into_tracker(self) -> T {
        self.tracker
    }

    fn row_id(&self, event: &CloneEvent) -> String {
        let path = event.module_path();
        if path.is_empty() {
            self.top_level.clone()
        } else {
            path
        }
    }

    fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }

    fn label(&self, id: &str, reference: &str) -> String {
        format!("{} · Cloning from ref: {}", self.display_name(id), reference)
    }

    fn queued_label(&self, id: &str, reference: &str) -> String {
        format!(
            "{} (queued) · Cloning from ref: {}",
            self.display_name(id),
            reference
        )
    }

    fn current_percent(&self, id: &str) -> Option<u8> {
        self.rows.iter().find(|row| row.id == id).map(|row| row.percent)
    }

    fn upsert_row(&mut self, id: &str, percent: u8, label: String) -> ProgressRow {
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.percent = row.percent.max(percent);
                row.label = label;
                row.clone()
            }
            None => {
                let row = ProgressRow {
                    id: id.to_string(),
                    percent,
                    label,
                };
                self.rows.push(row.clone());
                row
            }
        }
    }

    fn on_discovered(&mut self, event: &CloneEvent) {
        let id = self.row_id(event);
        self.names.insert(id.clone(), event.name.clone());
        debug!(parent = %event.parent, id = %id, url = %event.url, "Submodule discovered");
        self.pending
            .entry(event.parent.clone())
            .or_default()
            .push(PendingDiscovery {
                id,
                name: event.name.clone(),
                url: event.url.clone(),
            });
    }

    fn on_clone_start(&mut self, event: &CloneEvent) {
        if let Some(batch) = self.pending.remove(&event.parent) {
            debug!(parent = %event.parent, count = batch.len(), "Flushing discovered submodules");
            for discovery in batch {
                let percent = self.current_percent(&discovery.id).unwrap_or(0);
                let label = self.queued_label(&discovery.id, &event.reference);
                debug!(id = %discovery.id, name = %discovery.name, url = %discovery.url, "Queued");
                self.upsert_row(&discovery.id, percent, label);
            }
            self.tracker.clear();
            for row in &self.rows {
                self.tracker.set(&row.id, row.percent, &row.label);
            }
        }

        let id = self.row_id(event);
        let percent = self.current_percent(&id).unwrap_or(0);
        let label = self.label(&id, &event.reference);
        let row = self.upsert_row(&id, percent, label);
        self.tracker.set(&row.id, row.percent, &row.label);
        self.tracker.render();
    }

    fn on_progress(&mut self, event: &CloneEvent) {
        let id = self.row_id(event);
        if let Some(current) = self.current_percent(&id) {
            if event.progress < current {
                debug!(id = %id, current, observed = event.progress, "Ignoring progress regression");
            }
            if event.progress <= current {
                return;
            }
        }

        let label = self.label(&id, &event.reference);
        let row = self.upsert_row(&id, event.progress, label);
        self.tracker.set(&row.id, row.percent, &row.label);
        self.tracker.render();
    }

    fn settle(&mut self, outcome: Outcome) {
        debug!(?outcome, rows = self.rows.len(), "Settling progress display");
        self.pending.clear();
        self.tracker.clear();
        self.outcome = Some(outcome);
    }
}

impl<T: ProgressTracker> CloneReporter for ProgressReporter<T> {
    fn report(&mut self, event: &CloneEvent) {
        if let Some(outcome) = self.outcome {
            debug!(?outcome, kind = ?event.kind, "Ignoring event after display settled");
            return;
        }

        match event.kind {
            CloneEventKind::SubmoduleDiscovered => self.on_discovered(event),
            CloneEventKind::SubmoduleCloneStart => self.on_clone_start(event),
            CloneEventKind::Progress => self.on_progress(event),
            CloneEventKind::CloneComplete => self.settle(Outcome::Complete),
            CloneEventKind::CloneFailed => self.settle(Outcome::Failed),
        }
    }
}
