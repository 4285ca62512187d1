//! # Playkit
//!
//! Embeddable playback control for single-screen media players.
//!
//! A host UI shows a small bundled catalogue of tracks and video clips, and
//! drives select / play / pause / stop / seek. Playkit owns the media-session
//! state machine and tells the host when to redraw its progress indicator;
//! the host owns rendering and input.
//!
//! ## Features
//!
//! The session core is always available. Backends are opt-in:
//!
//! - `audio`: track playback through the default output device (`rodio`).
//! - `video`: MP4/MOV clip probing and playback timing (`mp4`).
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! playkit = { version = "0.1", features = ["audio"] }
//! ```
//!
//! ```rust
//! use playkit::{Catalogue, MemoryBackend, PlaybackSessionController, format_progress};
//! use std::time::Duration;
//!
//! let catalogue = Catalogue::bundled();
//! let backend = MemoryBackend::for_catalogue(&catalogue, Duration::from_secs(180));
//! let mut session = PlaybackSessionController::new(backend, catalogue);
//!
//! session.select_by_name("Dancing in the Moonlight").unwrap();
//! session.seek(65).unwrap();
//! assert_eq!(format_progress(&session.snapshot()), "1:05 / 3:00");
//! ```

pub use playkit_session as session;
pub use playkit_session::{
    Catalogue, CatalogueEntry, MediaBackend, MediaError, MediaHandle, MediaKind, MemoryBackend,
    PlaybackSessionController, ProgressTick, RoutedBackend, SessionError, SessionSnapshot,
    SessionState, format_duration, format_progress,
};

#[cfg(feature = "audio")]
pub use playkit_audio as audio;

#[cfg(feature = "video")]
pub use playkit_video as video;

/// Backend that plays tracks with `rodio` and clips with the MP4 backend.
#[cfg(all(feature = "audio", feature = "video"))]
pub type DeviceBackend = RoutedBackend<playkit_audio::RodioBackend, playkit_video::Mp4Backend>;
