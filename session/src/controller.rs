//! The playback session state machine.
//!
//! `Idle → Selected → Playing ⇄ Paused → Stopped`, with `select` reachable
//! from every state. A failed `select`, or a stop whose handle cannot be
//! reacquired, lands back in `Idle`.

use crate::reporter::Reporter;
use crate::{
    Catalogue, CatalogueEntry, MediaBackend, MediaError, MediaHandle, ProgressTick,
    SessionBuilder, SessionError, SessionSnapshot, SessionState,
};
use async_channel::{Receiver, Sender};
use std::time::Duration;

struct PlaybackSession<H> {
    selected: Option<CatalogueEntry>,
    handle: Option<H>,
    position_secs: u64,
    duration_secs: u64,
    is_playing: bool,
    state: SessionState,
}

impl<H: MediaHandle> PlaybackSession<H> {
    const fn idle() -> Self {
        Self {
            selected: None,
            handle: None,
            position_secs: 0,
            duration_secs: 0,
            is_playing: false,
            state: SessionState::Idle,
        }
    }

    fn loaded(entry: CatalogueEntry, handle: H, state: SessionState) -> Self {
        Self {
            duration_secs: handle.duration().as_secs(),
            selected: Some(entry),
            handle: Some(handle),
            position_secs: 0,
            is_playing: false,
            state,
        }
    }
}

/// Owns the selected catalogue entry and its media handle.
///
/// All mutation goes through `&mut self`, so the session has exactly one
/// owner: the thread running the host's event loop. While playing, a
/// reporter thread sends [`ProgressTick`]s on [`progress_ticks`](Self::progress_ticks);
/// the host answers each with [`handle_tick`](Self::handle_tick), or drives
/// [`tick`](Self::tick) from its own timer instead.
pub struct PlaybackSessionController<B: MediaBackend> {
    backend: B,
    catalogue: Catalogue,
    progress_interval: Duration,
    session: PlaybackSession<B::Handle>,
    reporter: Option<Reporter>,
    next_generation: u64,
    tick_sender: Sender<ProgressTick>,
    tick_receiver: Receiver<ProgressTick>,
}

impl<B: MediaBackend> std::fmt::Debug for PlaybackSessionController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSessionController")
            .field("catalogue_len", &self.catalogue.len())
            .field("progress_interval", &self.progress_interval)
            .field("snapshot", &self.snapshot())
            .field("reporter", &self.reporter_generation())
            .finish_non_exhaustive()
    }
}

impl<B: MediaBackend> PlaybackSessionController<B> {
    /// Create a controller with the default progress interval.
    pub fn new(backend: B, catalogue: Catalogue) -> Self {
        SessionBuilder::new(backend).catalogue(catalogue).build()
    }

    /// Start configuring a controller around `backend`.
    pub fn builder(backend: B) -> SessionBuilder<B> {
        SessionBuilder::new(backend)
    }

    pub(crate) fn from_parts(backend: B, catalogue: Catalogue, progress_interval: Duration) -> Self {
        let (tick_sender, tick_receiver) = async_channel::bounded(1);
        Self {
            backend,
            catalogue,
            progress_interval,
            session: PlaybackSession::idle(),
            reporter: None,
            next_generation: 0,
            tick_sender,
            tick_receiver,
        }
    }

    /// Select `entry`, replacing whatever was selected before.
    ///
    /// The previous handle is halted and released before the new one is
    /// acquired. The new handle starts paused at position zero.
    ///
    /// # Errors
    /// Returns [`MediaError::ResourceUnavailable`] if `entry` is not part of
    /// the catalogue or the backend cannot open it. The session is then idle.
    pub fn select(&mut self, entry: &CatalogueEntry) -> Result<SessionSnapshot, MediaError> {
        self.release();
        if !self.catalogue.contains(entry) {
            log::warn!("{} is not in the catalogue", entry.display_name());
            return Err(MediaError::unavailable(
                entry.display_name(),
                "not in the catalogue",
            ));
        }
        self.acquire(entry.clone())
    }

    /// Select the catalogue entry called `display_name`.
    ///
    /// # Errors
    /// Same as [`select`](Self::select).
    pub fn select_by_name(&mut self, display_name: &str) -> Result<SessionSnapshot, MediaError> {
        self.release();
        let Some(entry) = self.catalogue.get(display_name).cloned() else {
            log::warn!("{display_name} is not in the catalogue");
            return Err(MediaError::unavailable(display_name, "not in the catalogue"));
        };
        self.acquire(entry)
    }

    /// Start or resume playback.
    ///
    /// Does nothing if already playing. If the media had played to its end,
    /// playback restarts from the beginning.
    ///
    /// # Errors
    /// Returns [`SessionError::NothingSelected`] without a selection.
    pub fn play(&mut self) -> Result<(), SessionError> {
        let session = &mut self.session;
        let handle = session.handle.as_mut().ok_or(SessionError::NothingSelected)?;
        if session.is_playing {
            return Ok(());
        }

        if session.duration_secs > 0 && session.position_secs >= session.duration_secs {
            match handle.seek(Duration::ZERO) {
                Ok(()) => session.position_secs = 0,
                Err(err) => log::warn!("rewind before replay failed: {err}"),
            }
        }

        handle.play();
        session.is_playing = true;
        session.state = SessionState::Playing;
        log::debug!("playing {}", self.title());
        self.start_reporter();
        Ok(())
    }

    /// Pause playback.
    ///
    /// Does nothing if not playing. The reporter is stopped before returning.
    ///
    /// # Errors
    /// Returns [`SessionError::NothingSelected`] without a selection.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.session.handle.is_none() {
            return Err(SessionError::NothingSelected);
        }
        if !self.session.is_playing {
            return Ok(());
        }

        self.cancel_reporter();
        let session = &mut self.session;
        if let Some(handle) = session.handle.as_mut() {
            handle.pause();
            session.position_secs = handle.position().as_secs().min(session.duration_secs);
        }
        session.is_playing = false;
        session.state = SessionState::Paused;
        log::debug!("paused {} at {}s", self.title(), self.session.position_secs);
        Ok(())
    }

    /// Stop playback and reload the selected entry from the start.
    ///
    /// The reporter is stopped and the old handle released before a fresh
    /// handle is acquired for the same entry.
    ///
    /// # Errors
    /// Returns [`SessionError::NothingSelected`] without a selection, or
    /// [`SessionError::Media`] if the fresh handle cannot be acquired, in
    /// which case the session is left idle.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        let Some(entry) = self
            .session
            .handle
            .as_ref()
            .and(self.session.selected.clone())
        else {
            return Err(SessionError::NothingSelected);
        };

        self.release();
        match self.backend.open(&entry) {
            Ok(handle) => {
                log::debug!("stopped {}", entry.display_name());
                self.session = PlaybackSession::loaded(entry, handle, SessionState::Stopped);
                Ok(())
            }
            Err(err) => {
                log::error!("failed to reload {} after stop: {err}", entry.display_name());
                Err(err.into())
            }
        }
    }

    /// Move to `target_secs`, clamped to the media's length.
    ///
    /// The reported position changes immediately.
    ///
    /// # Errors
    /// Returns [`SessionError::NothingSelected`] without a selection, or
    /// [`SessionError::Media`] if the backend rejects the seek; the position
    /// is then unchanged.
    pub fn seek(&mut self, target_secs: i64) -> Result<(), SessionError> {
        let session = &mut self.session;
        let handle = session.handle.as_mut().ok_or(SessionError::NothingSelected)?;

        let target = u64::try_from(target_secs)
            .unwrap_or(0)
            .min(session.duration_secs);
        handle.seek(Duration::from_secs(target)).map_err(|err| {
            log::warn!("seek to {target}s failed: {err}");
            err
        })?;
        session.position_secs = target;
        Ok(())
    }

    /// Sample the handle while playing and report the session.
    ///
    /// When the media has reached its end the session pauses there and the
    /// reporter stops, so the host can stop scheduling ticks.
    pub fn tick(&mut self) -> SessionSnapshot {
        let mut finished = false;
        let session = &mut self.session;
        if session.is_playing {
            if let Some(handle) = session.handle.as_mut() {
                session.position_secs = handle.position().as_secs().min(session.duration_secs);
                if !handle.is_playing() {
                    handle.pause();
                    session.is_playing = false;
                    session.state = SessionState::Paused;
                    finished = true;
                }
            }
        }

        if finished {
            log::debug!("{} reached the end", self.title());
            self.cancel_reporter();
        }
        self.snapshot()
    }

    /// Apply a tick from the reporter.
    ///
    /// Ticks from a reporter that has since been cancelled are ignored and
    /// yield `None`.
    pub fn handle_tick(&mut self, tick: ProgressTick) -> Option<SessionSnapshot> {
        if self.reporter_generation() == Some(tick.generation) {
            Some(self.tick())
        } else {
            log::trace!("ignoring stale tick from reporter {}", tick.generation);
            None
        }
    }

    /// Current session state, without sampling the handle.
    pub fn snapshot(&self) -> SessionSnapshot {
        let session = &self.session;
        let entry = session.selected.as_ref();
        SessionSnapshot {
            position_secs: session.position_secs,
            duration_secs: session.duration_secs,
            is_playing: session.is_playing,
            state: session.state,
            title: entry.map(|e| e.display_name().to_owned()),
            artwork: entry.and_then(|e| e.artwork().cloned()),
            kind: entry.map(CatalogueEntry::kind),
        }
    }

    /// Receiver for reporter ticks.
    ///
    /// Holds at most one pending tick; ticks are coalesced if the host falls
    /// behind.
    pub fn progress_ticks(&self) -> Receiver<ProgressTick> {
        self.tick_receiver.clone()
    }

    /// Generation of the running reporter, if any.
    pub fn reporter_generation(&self) -> Option<u64> {
        self.reporter.as_ref().map(Reporter::generation)
    }

    /// The selected entry.
    pub const fn selected(&self) -> Option<&CatalogueEntry> {
        self.session.selected.as_ref()
    }

    /// The catalogue entries are selected from.
    pub const fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Interval between reporter ticks.
    pub const fn progress_interval(&self) -> Duration {
        self.progress_interval
    }

    /// The media backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The media backend, mutably.
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn title(&self) -> &str {
        self.session
            .selected
            .as_ref()
            .map_or("<nothing>", CatalogueEntry::display_name)
    }

    fn acquire(&mut self, entry: CatalogueEntry) -> Result<SessionSnapshot, MediaError> {
        let handle = self.backend.open(&entry).map_err(|err| {
            log::warn!("cannot open {}: {err}", entry.display_name());
            err
        })?;
        log::info!(
            "selected {} ({}s)",
            entry.display_name(),
            handle.duration().as_secs()
        );
        self.session = PlaybackSession::loaded(entry, handle, SessionState::Selected);
        Ok(self.snapshot())
    }

    /// Stop the reporter, halt and drop the handle, and go idle.
    fn release(&mut self) {
        self.cancel_reporter();
        if let Some(mut handle) = self.session.handle.take() {
            handle.stop();
        }
        self.session = PlaybackSession::idle();
    }

    fn start_reporter(&mut self) {
        if self.reporter.is_some() {
            return;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        match Reporter::spawn(generation, self.progress_interval, self.tick_sender.clone()) {
            Ok(reporter) => self.reporter = Some(reporter),
            Err(err) => log::warn!("progress reporter unavailable, host must poll: {err}"),
        }
    }

    fn cancel_reporter(&mut self) {
        if let Some(reporter) = self.reporter.take() {
            reporter.cancel();
        }
        // drop a tick the host has not picked up yet
        while self.tick_receiver.try_recv().is_ok() {}
    }
}

impl<B: MediaBackend> Drop for PlaybackSessionController<B> {
    fn drop(&mut self) {
        self.release();
    }
}
