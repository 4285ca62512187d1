//! MP4 clip backend.
//!
//! The backend validates and measures clips; decoding and drawing frames is
//! left to the host's video surface, which follows the handle's position.

use crate::{ClipInfo, VideoError};
use playkit_session::{
    CatalogueEntry, MediaBackend, MediaError, MediaHandle, PlaybackClock, SystemTime, TimeSource,
};
use std::path::PathBuf;
use std::time::Duration;

/// Opens catalogue clips from an assets directory.
#[derive(Debug, Clone)]
pub struct Mp4Backend<T = SystemTime> {
    assets_root: PathBuf,
    time: T,
}

impl Mp4Backend {
    /// Resolve clips against `assets_root`, timing playback with the system clock.
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        Self::with_time(assets_root, SystemTime::new())
    }
}

impl<T: TimeSource + Clone> Mp4Backend<T> {
    /// Resolve clips against `assets_root`, timing playback with `time`.
    pub fn with_time(assets_root: impl Into<PathBuf>, time: T) -> Self {
        Self {
            assets_root: assets_root.into(),
            time,
        }
    }

    /// Resolve a media locator to a file path.
    #[must_use]
    pub fn resolve(&self, entry: &CatalogueEntry) -> PathBuf {
        self.assets_root.join(entry.media().as_str())
    }

    fn handle(&self, entry: &CatalogueEntry, info: ClipInfo) -> VideoHandle<T> {
        VideoHandle {
            info,
            path: self.resolve(entry),
            clock: PlaybackClock::new(self.time.clone(), info.duration),
        }
    }
}

impl<T: TimeSource + Clone> MediaBackend for Mp4Backend<T> {
    type Handle = VideoHandle<T>;

    fn open(&mut self, entry: &CatalogueEntry) -> Result<Self::Handle, MediaError> {
        let path = self.resolve(entry);
        let info = ClipInfo::probe(&path).map_err(|e: VideoError| {
            MediaError::unavailable(entry.display_name(), format!("{}: {e}", path.display()))
        })?;
        log::debug!(
            "opened {} ({}x{}, {} frames, {:?})",
            path.display(),
            info.width,
            info.height,
            info.frame_count,
            info.duration
        );
        Ok(self.handle(entry, info))
    }
}

/// One loaded clip.
#[derive(Debug)]
pub struct VideoHandle<T = SystemTime> {
    info: ClipInfo,
    path: PathBuf,
    clock: PlaybackClock<T>,
}

impl<T> VideoHandle<T> {
    /// Container details of the clip.
    pub const fn info(&self) -> &ClipInfo {
        &self.info
    }

    /// Resolved path of the clip, for the host's video surface.
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl<T: TimeSource> MediaHandle for VideoHandle<T> {
    fn duration(&self) -> Duration {
        self.info.duration
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

#[cfg(test)]
mod tests {
    use super::*;
    use playkit_session::ManualTime;

    const CLIP: ClipInfo = ClipInfo {
        width: 640,
        height: 360,
        frame_count: 1500,
        duration: Duration::from_secs(60),
    };

    #[test]
    fn handle_tracks_position_with_time() {
        let time = ManualTime::new();
        let backend = Mp4Backend::with_time("assets", time.clone());
        let entry = CatalogueEntry::video("Ride Slow", "raw/ride_slow.mp4");
        let mut handle = backend.handle(&entry, CLIP);

        assert_eq!(handle.path(), &PathBuf::from("assets/raw/ride_slow.mp4"));
        assert_eq!(handle.duration(), Duration::from_secs(60));
        assert!(!handle.is_playing());

        handle.play();
        time.advance(Duration::from_secs(10));
        assert_eq!(handle.position(), Duration::from_secs(10));

        handle.seek(Duration::from_secs(55)).unwrap();
        time.advance(Duration::from_secs(10));
        assert_eq!(handle.position(), Duration::from_secs(60));
        assert!(!handle.is_playing());

        handle.stop();
        assert_eq!(handle.position(), Duration::ZERO);
    }

    #[test]
    fn opens_a_clip_from_the_assets_root() {
        let dir = crate::fixture::scratch_dir("open");
        crate::fixture::write_clip(&dir, "raw/hometown.mp4", 30);
        let time = ManualTime::new();
        let mut backend = Mp4Backend::with_time(&dir, time.clone());
        let entry = CatalogueEntry::video("Hometown", "raw/hometown.mp4");

        let mut handle = backend.open(&entry).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(handle.path(), &dir.join("raw/hometown.mp4"));
        assert_eq!(handle.info().frame_count, 30);
        assert_eq!(handle.duration(), Duration::from_secs(3));

        handle.play();
        time.advance(Duration::from_secs(5));
        assert_eq!(handle.position(), Duration::from_secs(3));
        assert!(!handle.is_playing());
    }

    #[test]
    fn missing_clip_is_unavailable() {
        let mut backend = Mp4Backend::new("/no/such/assets");
        let entry = CatalogueEntry::video("Hometown", "raw/hometown.mp4");
        let err = backend.open(&entry).unwrap_err();
        assert!(
            matches!(err, MediaError::ResourceUnavailable { ref name, ref reason }
                if name == "Hometown" && reason.contains("hometown.mp4"))
        );
    }
}
