//! Seams between the session and whatever actually decodes and plays media.

use crate::{CatalogueEntry, MediaError, MediaKind};
use std::time::Duration;

/// An owned, playable media resource bound to one catalogue entry.
///
/// Dropping the handle releases the underlying resource.
pub trait MediaHandle {
    /// Total length of the media.
    fn duration(&self) -> Duration;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Whether the media is currently advancing.
    ///
    /// Returns `false` once playback reaches the end.
    fn is_playing(&self) -> bool;

    /// Start or resume playback.
    fn play(&mut self);

    /// Pause playback, keeping the position.
    fn pause(&mut self);

    /// Halt playback ahead of release.
    fn stop(&mut self);

    /// Move to `position`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot reposition this media.
    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;
}

/// Opens catalogue entries into playable handles.
pub trait MediaBackend {
    /// Handle type produced by this backend.
    type Handle: MediaHandle;

    /// Acquire a paused handle positioned at the start of `entry`'s media.
    ///
    /// # Errors
    /// Returns [`MediaError::ResourceUnavailable`] if the media cannot be opened.
    fn open(&mut self, entry: &CatalogueEntry) -> Result<Self::Handle, MediaError>;
}

impl<B: MediaBackend + ?Sized> MediaBackend for Box<B> {
    type Handle = B::Handle;

    fn open(&mut self, entry: &CatalogueEntry) -> Result<Self::Handle, MediaError> {
        (**self).open(entry)
    }
}

/// Dispatches entries to an audio or a video backend by [`MediaKind`].
#[derive(Debug)]
pub struct RoutedBackend<A, V> {
    audio: A,
    video: V,
}

impl<A, V> RoutedBackend<A, V> {
    /// Route tracks to `audio` and clips to `video`.
    pub const fn new(audio: A, video: V) -> Self {
        Self { audio, video }
    }

    /// The audio backend.
    pub const fn audio(&self) -> &A {
        &self.audio
    }

    /// The video backend.
    pub const fn video(&self) -> &V {
        &self.video
    }
}

/// Handle produced by a [`RoutedBackend`].
#[derive(Debug)]
pub enum RoutedHandle<A, V> {
    /// Handle from the audio backend.
    Audio(A),
    /// Handle from the video backend.
    Video(V),
}

macro_rules! routed {
    ($handle:expr, $h:ident => $body:expr) => {
        match $handle {
            RoutedHandle::Audio($h) => $body,
            RoutedHandle::Video($h) => $body,
        }
    };
}

impl<A: MediaHandle, V: MediaHandle> MediaHandle for RoutedHandle<A, V> {
    fn duration(&self) -> Duration {
        routed!(self, h => h.duration())
    }

    fn position(&self) -> Duration {
        routed!(self, h => h.position())
    }

    fn is_playing(&self) -> bool {
        routed!(self, h => h.is_playing())
    }

    fn play(&mut self) {
        routed!(self, h => h.play());
    }

    fn pause(&mut self) {
        routed!(self, h => h.pause());
    }

    fn stop(&mut self) {
        routed!(self, h => h.stop());
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        routed!(self, h => h.seek(position))
    }
}

impl<A: MediaBackend, V: MediaBackend> MediaBackend for RoutedBackend<A, V> {
    type Handle = RoutedHandle<A::Handle, V::Handle>;

    fn open(&mut self, entry: &CatalogueEntry) -> Result<Self::Handle, MediaError> {
        match entry.kind() {
            MediaKind::Audio => self.audio.open(entry).map(RoutedHandle::Audio),
            MediaKind::Video => self.video.open(entry).map(RoutedHandle::Video),
        }
    }
}
