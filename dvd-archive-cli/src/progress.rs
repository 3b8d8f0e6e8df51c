//! Progress display for a running import.

use std::time::Duration;

use dvd_archive_lib::ProgressUpdate;
use indicatif::{ProgressBar, ProgressStyle};

pub(crate) struct ImportProgress {
    bar: ProgressBar,
}

impl ImportProgress {
    /// A bar on stderr, or a hidden one when `quiet`.
    pub(crate) fn new(quiet: bool) -> Self {
        if quiet {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .expect("static pattern")
            .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub(crate) fn update(&self, update: &ProgressUpdate) {
        if self.bar.length() != Some(update.total) {
            self.bar.set_length(update.total);
        }
        self.bar.set_position(update.completed);
        self.bar.set_message(update.description.clone());
    }

    /// Run `f` with the bar hidden, so log lines don't tear it.
    pub(crate) fn suspend<F: FnOnce()>(&self, f: F) {
        self.bar.suspend(f);
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
