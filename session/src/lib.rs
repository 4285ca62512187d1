//! Media-session state machine for a single-screen player.
//!
//! This crate provides:
//! - **Catalogue**: the fixed list of bundled tracks and video clips
//! - **Session control**: select / play / pause / stop / seek over one owned media handle
//! - **Progress reporting**: a cancellable reporter that tells the host when to sample
//! - **Formatting**: `m:ss` rendering for positions and durations
//!
//! Decoding and output live behind [`MediaBackend`]; the host UI renders
//! [`SessionSnapshot`]s and owns input.
//!
//! # Example
//!
//! ```
//! use playkit_session::{Catalogue, MemoryBackend, PlaybackSessionController};
//! use std::time::Duration;
//!
//! let catalogue = Catalogue::bundled();
//! let backend = MemoryBackend::for_catalogue(&catalogue, Duration::from_secs(125));
//! let mut session = PlaybackSessionController::new(backend, catalogue);
//!
//! let snapshot = session.select_by_name("Eye of the Tiger")?;
//! assert_eq!(snapshot.duration_secs, 125);
//!
//! session.play()?;
//! session.backend().time().advance(Duration::from_secs(3));
//! assert_eq!(session.tick().position_secs, 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod backend;
mod catalogue;
mod clock;
mod config;
mod controller;
mod error;
mod format;
mod memory;
mod reporter;

pub use backend::{MediaBackend, MediaHandle, RoutedBackend, RoutedHandle};
pub use catalogue::{ArtworkRef, Catalogue, CatalogueBuilder, CatalogueEntry, MediaKind, MediaRef};
pub use clock::{ManualTime, PlaybackClock, SystemTime, TimeSource};
pub use config::{DEFAULT_PROGRESS_INTERVAL, SessionBuilder};
pub use controller::PlaybackSessionController;
pub use error::{CatalogueError, MediaError, SessionError};
pub use format::{format_duration, format_progress};
pub use memory::{BackendEvent, MemoryBackend, MemoryHandle};
pub use reporter::ProgressTick;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// An entry is loaded and has not been started.
    Selected,
    /// Media is playing.
    Playing,
    /// Media is paused, or reached its end.
    Paused,
    /// Playback was stopped and a fresh handle is loaded at the start.
    Stopped,
}

/// Immutable read of session state for the host to render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// Current position in whole seconds, within `0..=duration_secs`.
    pub position_secs: u64,
    /// Length of the selected media in whole seconds.
    pub duration_secs: u64,
    /// Whether media is playing.
    pub is_playing: bool,
    /// Lifecycle state.
    pub state: SessionState,
    /// Display name of the selected entry.
    pub title: Option<String>,
    /// Artwork of the selected entry.
    pub artwork: Option<ArtworkRef>,
    /// Kind of the selected entry.
    pub kind: Option<MediaKind>,
}

impl SessionSnapshot {
    /// Fraction of the media played, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            0.0
        } else {
            (self.position_secs as f64 / self.duration_secs as f64).clamp(0.0, 1.0)
        }
    }

    /// Whether an entry is selected.
    #[must_use]
    pub const fn has_selection(&self) -> bool {
        !matches!(self.state, SessionState::Idle)
    }
}
