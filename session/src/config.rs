//! Session construction and its tunables.

use crate::{Catalogue, MediaBackend, PlaybackSessionController};
use std::time::Duration;

/// Interval between progress ticks unless configured otherwise.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Builder for a [`PlaybackSessionController`].
#[derive(Debug)]
pub struct SessionBuilder<B> {
    backend: B,
    catalogue: Catalogue,
    progress_interval: Duration,
}

impl<B: MediaBackend> SessionBuilder<B> {
    /// Start a builder around `backend` with an empty catalogue.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            catalogue: Catalogue::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Set the catalogue entries can be selected from.
    #[must_use]
    pub fn catalogue(mut self, catalogue: Catalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Set how often the reporter ticks while playing.
    ///
    /// Zero is raised to one millisecond.
    #[must_use]
    pub fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Build the controller.
    pub fn build(self) -> PlaybackSessionController<B> {
        PlaybackSessionController::from_parts(self.backend, self.catalogue, self.progress_interval)
    }
}
