//! Video clip backend for playkit sessions.
//!
//! This crate provides:
//! - **Probing**: read MP4/MOV headers and describe the video track
//! - **Playback timing**: a [`MediaBackend`](playkit_session::MediaBackend)
//!   whose handles follow a playback clock the host's video surface can sync to

#![warn(missing_docs)]

#[cfg(test)]
mod fixture;
mod player;
mod probe;

pub use player::{Mp4Backend, VideoHandle};
pub use probe::ClipInfo;

/// Errors that can occur with video operations.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    /// IO error during file operations.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Container format error.
    #[error("Container error: {0}")]
    Container(String),
}
