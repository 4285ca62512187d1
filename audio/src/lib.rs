//! Audio playback backend for playkit sessions.
//!
//! Opens catalogue tracks from an assets directory and plays them through
//! the default output device with `rodio`. Supports everything rodio decodes
//! (vorbis, mp3, flac, wav).
//!
//! ```no_run
//! use playkit_audio::RodioBackend;
//! use playkit_session::{Catalogue, PlaybackSessionController};
//!
//! let backend = RodioBackend::new().assets_root("assets").build()?;
//! let mut session = PlaybackSessionController::new(backend, Catalogue::bundled());
//! session.select_by_name("Karma Chameleon")?;
//! session.play()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod player;

pub use player::{AudioError, AudioHandle, RodioBackend, RodioBackendBuilder, rodio};
