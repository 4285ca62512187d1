//! A deterministic backend with no audio output.
//!
//! Media lengths are registered up front and positions advance with a
//! [`ManualTime`], so hosts can run the full session without a sound device.

use crate::{
    CatalogueEntry, ManualTime, MediaBackend, MediaError, MediaHandle, PlaybackClock,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Lifecycle event recorded by a [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// A handle was acquired for the named entry.
    Opened(String),
    /// The handle for the named entry was released.
    Released(String),
}

type EventLog = Arc<Mutex<Vec<BackendEvent>>>;

fn lock(log: &EventLog) -> MutexGuard<'_, Vec<BackendEvent>> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`MediaBackend`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    media: HashMap<String, Duration>,
    time: ManualTime,
    events: EventLog,
}

impl MemoryBackend {
    /// Create a backend with no media.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend knowing every entry of `catalogue`, each `length` long.
    #[must_use]
    pub fn for_catalogue(catalogue: &crate::Catalogue, length: Duration) -> Self {
        catalogue.iter().fold(Self::new(), |backend, entry| {
            backend.with_media(entry.media().as_str(), length)
        })
    }

    /// Register media at `locator` with the given length.
    #[must_use]
    pub fn with_media(mut self, locator: impl Into<String>, length: Duration) -> Self {
        self.insert_media(locator, length);
        self
    }

    /// Register or replace media at `locator`.
    pub fn insert_media(&mut self, locator: impl Into<String>, length: Duration) {
        self.media.insert(locator.into(), length);
    }

    /// Forget media at `locator`; later opens of it fail.
    pub fn remove_media(&mut self, locator: &str) {
        self.media.remove(locator);
    }

    /// The time source driving every handle from this backend.
    #[must_use]
    pub const fn time(&self) -> &ManualTime {
        &self.time
    }

    /// Lifecycle events so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<BackendEvent> {
        lock(&self.events).clone()
    }

    /// Number of handles acquired so far.
    #[must_use]
    pub fn open_count(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| matches!(event, BackendEvent::Opened(_)))
            .count()
    }

    /// Number of handles currently alive.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        let events = lock(&self.events);
        let released = events
            .iter()
            .filter(|event| matches!(event, BackendEvent::Released(_)))
            .count();
        events.len() - 2 * released
    }
}

impl MediaBackend for MemoryBackend {
    type Handle = MemoryHandle;

    fn open(&mut self, entry: &CatalogueEntry) -> Result<Self::Handle, MediaError> {
        let length = self
            .media
            .get(entry.media().as_str())
            .copied()
            .ok_or_else(|| {
                MediaError::unavailable(
                    entry.display_name(),
                    format!("no media at {}", entry.media()),
                )
            })?;

        lock(&self.events).push(BackendEvent::Opened(entry.display_name().to_owned()));
        Ok(MemoryHandle {
            name: entry.display_name().to_owned(),
            clock: PlaybackClock::new(self.time.clone(), length),
            events: Arc::clone(&self.events),
        })
    }
}

/// Handle produced by a [`MemoryBackend`].
#[derive(Debug)]
pub struct MemoryHandle {
    name: String,
    clock: PlaybackClock<ManualTime>,
    events: EventLog,
}

impl MediaHandle for MemoryHandle {
    fn duration(&self) -> Duration {
        self.clock.length()
    }

    fn position(&self) -> Duration {
        self.clock.position()
    }

    fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    fn play(&mut self) {
        self.clock.start();
    }

    fn pause(&mut self) {
        self.clock.pause();
    }

    fn stop(&mut self) {
        self.clock.reset();
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        self.clock.seek(position);
        Ok(())
    }
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        lock(&self.events).push(BackendEvent::Released(std::mem::take(&mut self.name)));
    }
}
