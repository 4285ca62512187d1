//! Container probing for bundled clips.

use crate::VideoError;
use std::path::Path;
use std::time::Duration;

/// What the session needs to know about a clip before playing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of video samples.
    pub frame_count: u32,
    /// Presentation length.
    pub duration: Duration,
}

impl ClipInfo {
    /// Read the header of an MP4/MOV file and describe its video track.
    ///
    /// # Errors
    /// Returns [`VideoError::Io`] if the file cannot be read, or
    /// [`VideoError::Container`] if it is not a container with a video track.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self, VideoError> {
        let file = std::fs::File::open(path.as_ref())?;
        let size = file.metadata()?.len();
        let reader = mp4::Mp4Reader::read_header(std::io::BufReader::new(file), size)
            .map_err(|e| VideoError::Container(e.to_string()))?;

        let track = reader
            .tracks()
            .values()
            .find(|track| matches!(track.track_type(), Ok(mp4::TrackType::Video)))
            .ok_or_else(|| VideoError::Container("No video track found".into()))?;

        // some muxers leave the track duration empty and only fill mvhd
        let duration = match track.duration() {
            d if d.is_zero() => reader.duration(),
            d => d,
        };

        Ok(Self {
            width: u32::from(track.width()),
            height: u32::from(track.height()),
            frame_count: track.sample_count(),
            duration,
        })
    }
}
