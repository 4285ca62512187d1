//! rodio-backed [`MediaBackend`] for catalogue tracks.
//!
//! Each handle owns its own [`Sink`] on the shared output stream. Sinks are
//! created paused so that selecting a track never starts sound on its own.

use playkit_session::{CatalogueEntry, MediaBackend, MediaError, MediaHandle};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Re-export rodio for advanced users
pub use rodio;

/// Errors that can occur while opening audio.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// Failed to initialize audio output.
    #[error("failed to init audio output: {0}")]
    OutputInitFailed(String),

    /// The media file could not be read.
    #[error("failed to load audio {}: {source}", .path.display())]
    LoadFailed {
        /// Resolved path of the media file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not in a format rodio can decode.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(#[from] rodio::decoder::DecoderError),

    /// A sink could not be attached to the output stream.
    #[error("playback failed: {0}")]
    PlaybackFailed(#[from] rodio::PlayError),
}

/// Builder for a [`RodioBackend`].
#[derive(Debug, Default)]
pub struct RodioBackendBuilder {
    assets_root: Option<PathBuf>,
    volume: Option<f32>,
}

impl RodioBackendBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory media locators are resolved against (defaults to the
    /// working directory).
    #[must_use]
    pub fn assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = Some(root.into());
        self
    }

    /// Volume for every handle (0.0 to 1.0).
    #[must_use]
    pub const fn volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output cannot be initialized.
    pub fn build(self) -> Result<RodioBackend, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::OutputInitFailed(e.to_string()))?;

        Ok(RodioBackend {
            _stream: stream,
            stream_handle,
            assets_root: self.assets_root.unwrap_or_default(),
            volume: self.volume.unwrap_or(1.0).clamp(0.0, 1.0),
        })
    }
}

/// Plays catalogue tracks through the default audio device.
pub struct RodioBackend {
    // Keep stream alive - must not be dropped while sinks are in use
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    assets_root: PathBuf,
    volume: f32,
}

impl std::fmt::Debug for RodioBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioBackend")
            .field("assets_root", &self.assets_root)
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}

impl RodioBackend {
    /// Create a new backend builder.
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> RodioBackendBuilder {
        RodioBackendBuilder::new()
    }

    /// Resolve a media locator to a file path.
    #[must_use]
    pub fn resolve(&self, entry: &CatalogueEntry) -> PathBuf {
        self.assets_root.join(entry.media().as_str())
    }
}

impl MediaBackend for RodioBackend {
    type Handle = AudioHandle;

    fn open(&mut self, entry: &CatalogueEntry) -> Result<Self::Handle, MediaError> {
        let path = self.resolve(entry);
        let handle = Sink::try_new(&self.stream_handle)
            .map_err(AudioError::from)
            .and_then(|sink| AudioHandle::load(entry.display_name(), path, sink))
            .map_err(|e| MediaError::unavailable(entry.display_name(), e.to_string()))?;
        handle.set_volume(self.volume);
        log::debug!("opened {} ({:?})", handle.path.display(), handle.duration);
        Ok(handle)
    }
}

fn open(path: &Path) -> Result<BufReader<File>, AudioError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| AudioError::LoadFailed {
            path: path.to_owned(),
            source,
        })
}

/// Decode the whole file and derive its length from the frame count.
fn measure_duration(path: &Path) -> Result<Duration, AudioError> {
    let decoder = Decoder::new(open(path)?)?;
    let per_second = u64::from(decoder.channels()) * u64::from(decoder.sample_rate());
    if per_second == 0 {
        return Ok(Duration::ZERO);
    }
    let samples = decoder.count() as u64;
    Ok(Duration::from_micros(samples * 1_000_000 / per_second))
}

/// One loaded track on its own sink.
///
/// A sink plays its source once. When the track has run out the handle
/// queues it again from the file before resuming or seeking.
pub struct AudioHandle {
    name: String,
    path: PathBuf,
    sink: Sink,
    duration: Duration,
}

impl std::fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioHandle")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

impl AudioHandle {
    /// Decode `path` onto `sink`, leaving the sink paused.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(name: &str, path: PathBuf, sink: Sink) -> Result<Self, AudioError> {
        let source = Decoder::new(open(&path)?)?;
        let duration = match source.total_duration() {
            Some(d) => d,
            // VBR mp3 and friends do not report a length up front
            None => measure_duration(&path)?,
        };

        sink.pause();
        sink.append(source);
        Ok(Self {
            name: name.to_owned(),
            path,
            sink,
            duration,
        })
    }

    /// Queue the track again if the sink has played it out. Keeps the sink paused.
    fn reload(&self) -> Result<(), AudioError> {
        if self.sink.empty() {
            let source = Decoder::new(open(&self.path)?)?;
            self.sink.pause();
            self.sink.append(source);
            log::debug!("requeued {} after it finished", self.name);
        }
        Ok(())
    }

    /// Get direct access to the underlying rodio Sink.
    ///
    /// Use this for advanced audio manipulation.
    #[must_use]
    pub const fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Set volume (0.0 to 1.0).
    pub fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }
}

impl MediaHandle for AudioHandle {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn position(&self) -> Duration {
        self.sink.get_pos().min(self.duration)
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn play(&mut self) {
        match self.reload() {
            Ok(()) => self.sink.play(),
            Err(err) => log::warn!("cannot replay {}: {err}", self.name),
        }
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        self.reload()
            .map_err(|e| MediaError::unavailable(&self.name, e.to_string()))?;
        self.sink
            .try_seek(position.min(self.duration))
            .map_err(|e| MediaError::Unseekable {
                name: self.name.clone(),
                reason: e.to_string(),
            })
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        // detach from the output stream right away instead of at the mixer's next pass
        self.sink.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playkit_session::{Catalogue, PlaybackSessionController, SessionState};
    use rodio::queue::SourcesQueueOutput;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Instant;

    /// Pulls samples off an idle sink's queue in place of a sound card,
    /// roughly ten times faster than real time.
    struct FakeOutput {
        running: Arc<AtomicBool>,
        thread: Option<thread::JoinHandle<()>>,
    }

    impl FakeOutput {
        fn start(mut queue: SourcesQueueOutput<f32>) -> Self {
            let running = Arc::new(AtomicBool::new(true));
            let flag = running.clone();
            let thread = thread::spawn(move || {
                while flag.load(Ordering::Relaxed) {
                    // 10 ms of 8 kHz mono
                    for _ in 0..80 {
                        queue.next();
                    }
                    thread::sleep(Duration::from_millis(1));
                }
            });
            Self {
                running,
                thread: Some(thread),
            }
        }
    }

    impl Drop for FakeOutput {
        fn drop(&mut self) {
            self.running.store(false, Ordering::Relaxed);
            if let Some(thread) = self.thread.take() {
                thread.join().unwrap();
            }
        }
    }

    fn wait_until(what: &str, mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !done() {
            assert!(Instant::now() < deadline, "timed out waiting for {what}");
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn idle_handle(path: PathBuf) -> (AudioHandle, FakeOutput) {
        let (sink, queue) = Sink::new_idle();
        let output = FakeOutput::start(queue);
        let handle = AudioHandle::load("Hometown", path, sink).unwrap();
        (handle, output)
    }

    /// Hands out handles on idle sinks, each with its own fake output.
    struct IdleBackend {
        path: PathBuf,
        outputs: Vec<FakeOutput>,
    }

    impl MediaBackend for IdleBackend {
        type Handle = AudioHandle;

        fn open(&mut self, entry: &CatalogueEntry) -> Result<Self::Handle, MediaError> {
            let (handle, output) = idle_handle(self.path.clone());
            assert_eq!(entry.media().as_str(), "raw/hometown.wav");
            self.outputs.push(output);
            Ok(handle)
        }
    }

    /// Write a silent 16-bit mono PCM wav of `secs` seconds at 8 kHz.
    fn write_wav(name: &str, secs: u32) -> PathBuf {
        let rate: u32 = 8000;
        let data_len = rate * secs * 2;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&(rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);

        let path = std::env::temp_dir().join(format!("playkit-audio-{}-{name}.wav", std::process::id()));
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn measures_length_by_decoding() {
        let path = write_wav("measure", 2);
        assert_eq!(measure_duration(&path).unwrap(), Duration::from_secs(2));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = measure_duration(Path::new("/no/such/track.mp3")).unwrap_err();
        assert!(matches!(err, AudioError::LoadFailed { .. }));
        assert!(err.to_string().contains("/no/such/track.mp3"));
    }

    #[test]
    fn garbage_is_unsupported() {
        let path = std::env::temp_dir().join(format!("playkit-audio-{}-garbage.mp3", std::process::id()));
        std::fs::write(&path, b"definitely not audio").unwrap();
        let err = measure_duration(&path).unwrap_err();
        assert!(matches!(err, AudioError::UnsupportedFormat(_)));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn loads_paused_with_known_length() {
        let path = write_wav("load", 2);
        let (handle, _output) = idle_handle(path.clone());
        assert_eq!(handle.duration(), Duration::from_secs(2));
        assert!(!handle.is_playing());
        assert!(handle.sink().is_paused());

        thread::sleep(Duration::from_millis(20));
        assert_eq!(handle.position(), Duration::ZERO);
        drop(handle);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn play_pause_and_seek() {
        let path = write_wav("transport", 4);
        let (mut handle, _output) = idle_handle(path.clone());

        handle.play();
        assert!(handle.is_playing());
        wait_until("playback to advance", || handle.position() > Duration::ZERO);

        handle.pause();
        assert!(!handle.is_playing());
        // let the mixer pick up the pause
        thread::sleep(Duration::from_millis(20));
        let held = handle.position();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(handle.position(), held);

        handle.seek(Duration::from_millis(1500)).unwrap();
        wait_until("seek to land", || {
            (1490..=1510).contains(&handle.position().as_millis())
        });
        assert!(!handle.is_playing());
        drop(handle);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn replays_after_reaching_the_end() {
        let path = write_wav("replay", 1);
        let (mut handle, _output) = idle_handle(path.clone());

        handle.play();
        wait_until("the track to finish", || !handle.is_playing());
        assert!(handle.sink().empty());

        handle.play();
        assert!(handle.is_playing());
        assert!(!handle.sink().empty());
        wait_until("the replay to finish", || !handle.is_playing());
        drop(handle);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn seeks_after_reaching_the_end() {
        let path = write_wav("seek-end", 1);
        let (mut handle, _output) = idle_handle(path.clone());

        handle.play();
        wait_until("the track to finish", || !handle.is_playing());

        handle.seek(Duration::from_millis(500)).unwrap();
        assert!(!handle.sink().empty());
        assert!(!handle.is_playing());
        wait_until("seek to land", || {
            (490..=510).contains(&handle.position().as_millis())
        });
        drop(handle);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn session_plays_a_finished_track_again() {
        let path = write_wav("session", 1);
        let catalogue = Catalogue::builder()
            .track("Hometown", "raw/hometown.wav")
            .build()
            .unwrap();
        let backend = IdleBackend {
            path: path.clone(),
            outputs: Vec::new(),
        };
        let mut session = PlaybackSessionController::new(backend, catalogue);
        session.select_by_name("Hometown").unwrap();

        session.play().unwrap();
        wait_until("the session to notice the end", || {
            session.tick().state == SessionState::Paused
        });

        session.play().unwrap();
        let snapshot = session.tick();
        assert_eq!(snapshot.state, SessionState::Playing);
        assert!(snapshot.is_playing);

        drop(session);
        std::fs::remove_file(path).unwrap();
    }
}
