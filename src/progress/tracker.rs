//! Progress sinks driven by the reporter
//!
//! A [`ProgressTracker`] owns the actual display. The reporter decides what
//! the rows are; the tracker decides how they look.

use crate::git::Logger;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};

const BAR_TEMPLATE: &str = "{bar:30.cyan/blue} {pos:>3}% {msg}";
const LINE_STEP: u8 = 25;

/// One visible progress row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRow {
    pub id: String,
    pub percent: u8,
    pub label: String,
}

/// External progress display
pub trait ProgressTracker: Send {
    /// Create the row `id` or update it in place
    fn set(&mut self, id: &str, percent: u8, label: &str);

    /// Redraw the current rows
    fn render(&mut self);

    /// Wipe the display and forget every row
    fn clear(&mut self);

    /// Current rows in creation order
    fn rows(&self) -> Vec<ProgressRow>;
}

fn upsert(rows: &mut Vec<ProgressRow>, id: &str, percent: u8, label: &str) -> usize {
    match rows.iter().position(|row| row.id == id) {
        Some(index) => {
            rows[index].percent = percent;
            rows[index].label = label.to_string();
            index
        }
        None => {
            rows.push(ProgressRow {
                id: id.to_string(),
                percent,
                label: label.to_string(),
            });
            rows.len() - 1
        }
    }
}

/// Live multi-row display on stderr built on indicatif bars
pub struct TerminalTracker {
    multi: MultiProgress,
    rows: Vec<ProgressRow>,
    bars: Vec<ProgressBar>,
}

impl TerminalTracker {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A tracker that keeps all state but draws nothing
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            rows: Vec::new(),
            bars: Vec::new(),
        }
    }

    fn new_bar(&self) -> ProgressBar {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_style(style);
        bar
    }
}

impl Default for TerminalTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker for TerminalTracker {
    fn set(&mut self, id: &str, percent: u8, label: &str) {
        let index = upsert(&mut self.rows, id, percent, label);
        if index == self.bars.len() {
            let bar = self.new_bar();
            self.bars.push(bar);
        }
        let bar = &self.bars[index];
        bar.set_position(u64::from(percent));
        bar.set_message(label.to_string());
    }

    fn render(&mut self) {
        for bar in &self.bars {
            bar.tick();
        }
    }

    fn clear(&mut self) {
        for bar in self.bars.drain(..) {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
        let _ = self.multi.clear();
        self.rows.clear();
    }

    fn rows(&self) -> Vec<ProgressRow> {
        self.rows.clone()
    }
}

/// Plain log-line display for non-interactive output
///
/// Prints a row when it is created, when its label changes, and each time
/// its percentage crosses another quarter. Lines go to stderr by default,
/// next to git's own diagnostics, so stdout stays clean for piping.
pub struct LineTracker<W: Write + Send = io::Stderr> {
    logger: Logger,
    writer: W,
    rows: Vec<ProgressRow>,
    printed: Vec<u8>,
}

impl LineTracker {
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl Default for LineTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> LineTracker<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            logger: Logger,
            writer,
            rows: Vec::new(),
            printed: Vec::new(),
        }
    }
}

impl<W: Write + Send> ProgressTracker for LineTracker<W> {
    fn set(&mut self, id: &str, percent: u8, label: &str) {
        let label_changed = self
            .rows
            .iter()
            .find(|row| row.id == id)
            .is_none_or(|row| row.label != label);
        let index = upsert(&mut self.rows, id, percent, label);
        if index == self.printed.len() {
            self.printed.push(0);
        }

        let last = self.printed[index];
        let crossed = (percent == 100 && last < 100) || percent / LINE_STEP > last / LINE_STEP;
        if label_changed || crossed {
            self.printed[index] = percent;
            let line = self.logger.line(id, &format!("{percent:>3}% {label}"));
            // A closed stderr is not worth failing the fetch over
            let _ = writeln!(self.writer, "{line}");
        }
    }

    fn render(&mut self) {}

    fn clear(&mut self) {
        self.rows.clear();
        self.printed.clear();
    }

    fn rows(&self) -> Vec<ProgressRow> {
        self.rows.clone()
    }
}
