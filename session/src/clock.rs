//! Position tracking for backends that have no native position query.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic source of elapsed time.
pub trait TimeSource {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemTime {
    origin: Instant,
}

impl SystemTime {
    /// Create a time source whose origin is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced time source, shared between clones.
///
/// ```
/// use playkit_session::{ManualTime, TimeSource};
/// use std::time::Duration;
///
/// let time = ManualTime::new();
/// let view = time.clone();
/// time.advance(Duration::from_secs(3));
/// assert_eq!(view.now(), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    millis: Arc<AtomicU64>,
}

impl ManualTime {
    /// Create a time source stopped at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Tracks the playback position of a media item of known length.
///
/// Position advances with the time source while running and is capped at the
/// item's length; reaching the end stops the clock.
#[derive(Debug, Clone)]
pub struct PlaybackClock<T> {
    time: T,
    length: Duration,
    base: Duration,
    running_since: Option<Duration>,
}

impl<T: TimeSource> PlaybackClock<T> {
    /// Create a stopped clock at position zero.
    pub const fn new(time: T, length: Duration) -> Self {
        Self {
            time,
            length,
            base: Duration::ZERO,
            running_since: None,
        }
    }

    /// Length of the tracked item.
    pub const fn length(&self) -> Duration {
        self.length
    }

    /// Current position, never past [`length`](Self::length).
    pub fn position(&self) -> Duration {
        let elapsed = self
            .running_since
            .map_or(Duration::ZERO, |since| self.time.now().saturating_sub(since));
        (self.base + elapsed).min(self.length)
    }

    /// Whether the clock is advancing.
    pub fn is_running(&self) -> bool {
        self.running_since.is_some() && self.position() < self.length
    }

    /// Start advancing from the current position.
    pub fn start(&mut self) {
        if self.running_since.is_none() && self.base < self.length {
            self.running_since = Some(self.time.now());
        }
    }

    /// Freeze at the current position.
    pub fn pause(&mut self) {
        self.base = self.position();
        self.running_since = None;
    }

    /// Move to `position` (capped at the length), keeping the run state.
    pub fn seek(&mut self, position: Duration) {
        self.base = position.min(self.length);
        if self.running_since.is_some() {
            self.running_since = Some(self.time.now());
        }
    }

    /// Stop and rewind to zero.
    pub fn reset(&mut self) {
        self.base = Duration::ZERO;
        self.running_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(secs: u64) -> (ManualTime, PlaybackClock<ManualTime>) {
        let time = ManualTime::new();
        let clock = PlaybackClock::new(time.clone(), Duration::from_secs(secs));
        (time, clock)
    }

    #[test]
    fn advances_only_while_running() {
        let (time, mut clock) = clock(10);
        time.advance(Duration::from_secs(2));
        assert_eq!(clock.position(), Duration::ZERO);

        clock.start();
        time.advance(Duration::from_secs(3));
        assert_eq!(clock.position(), Duration::from_secs(3));

        clock.pause();
        time.advance(Duration::from_secs(3));
        assert_eq!(clock.position(), Duration::from_secs(3));
        assert!(!clock.is_running());
    }

    #[test]
    fn stops_at_length() {
        let (time, mut clock) = clock(4);
        clock.start();
        time.advance(Duration::from_secs(9));
        assert_eq!(clock.position(), Duration::from_secs(4));
        assert!(!clock.is_running());
    }

    #[test]
    fn seek_while_running_continues_from_target() {
        let (time, mut clock) = clock(60);
        clock.start();
        time.advance(Duration::from_secs(5));
        clock.seek(Duration::from_secs(30));
        time.advance(Duration::from_secs(2));
        assert_eq!(clock.position(), Duration::from_secs(32));

        clock.seek(Duration::from_secs(600));
        assert_eq!(clock.position(), Duration::from_secs(60));
    }

    #[test]
    fn reset_rewinds_and_stops() {
        let (time, mut clock) = clock(60);
        clock.start();
        time.advance(Duration::from_secs(5));
        clock.reset();
        time.advance(Duration::from_secs(5));
        assert_eq!(clock.position(), Duration::ZERO);
    }
}
