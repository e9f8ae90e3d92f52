//! Preload progress and completion reports.

/// Message shown when every asset loaded.
pub const STATUS_OK: &str = "All assets loaded successfully";
/// Message shown when at least one asset fell back to a placeholder.
pub const STATUS_DEGRADED: &str = "Some assets failed to load, using fallbacks";

/// Live counters for the most recent preload, for a loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreloadProgress {
    /// Loads issued.
    pub total: usize,
    /// Loads that reached a terminal outcome.
    pub completed: usize,
    /// Terminal outcomes that were failures.
    pub failed: usize,
}

impl PreloadProgress {
    pub(crate) fn begin(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            failed: 0,
        }
    }

    pub(crate) fn record(&mut self, succeeded: bool) {
        self.completed += 1;
        if !succeeded {
            self.failed += 1;
        }
    }

    /// Completed share in `[0, 1]`. An empty preload counts as done.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f32 / self.total as f32).min(1.0)
    }

    /// True once every issued load is terminal.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }

    /// True if any load so far has failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.failed > 0
    }

    /// Loading-screen text.
    #[must_use]
    pub fn status_message(&self) -> String {
        if self.has_errors() {
            STATUS_DEGRADED.to_owned()
        } else if self.is_complete() {
            STATUS_OK.to_owned()
        } else {
            format!("Loading assets: {}%", (self.fraction() * 100.0).round() as u32)
        }
    }
}

/// Outcome of a finished preload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreloadReport {
    /// Names that decoded successfully, in request order.
    pub loaded: Vec<String>,
    /// Names that fell back to placeholders, in request order.
    pub failed: Vec<String>,
    /// Names skipped because they were already resolved or in flight.
    pub skipped: Vec<String>,
}

impl PreloadReport {
    /// Number of loads that reached a terminal outcome.
    #[must_use]
    pub fn total(&self) -> usize {
        self.loaded.len() + self.failed.len()
    }

    /// True iff no load failed. Vacuously true for an empty preload.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Status line for the host UI.
    #[must_use]
    pub fn status_message(&self) -> &'static str {
        if self.all_succeeded() {
            STATUS_OK
        } else {
            STATUS_DEGRADED
        }
    }
}
