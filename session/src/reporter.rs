//! Periodic progress signalling while a session is playing.
//!
//! The reporter never touches session state. It runs on its own thread and
//! sends a [`ProgressTick`] through a bounded channel once per interval; the
//! owner of the session applies it with
//! [`PlaybackSessionController::handle_tick`](crate::PlaybackSessionController::handle_tick).
//! Cancellation closes a channel the reporter is waiting on, so the thread
//! wakes immediately instead of finishing its current sleep.

use async_channel::{Receiver, Sender, TrySendError};
use futures::{FutureExt, pin_mut, select};
use futures_timer::Delay;
use std::thread::JoinHandle;
use std::time::Duration;

/// Signal that the next progress sample is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressTick {
    /// Reporter generation that produced the tick.
    pub generation: u64,
}

/// Closing side of a cancellation pair. Cancels on drop.
#[derive(Debug)]
struct CancelHandle {
    sender: Sender<()>,
}

impl CancelHandle {
    fn new() -> (Self, CancelSignal) {
        let (sender, receiver) = async_channel::bounded(1);
        (Self { sender }, CancelSignal { receiver })
    }

    fn cancel(&self) {
        self.sender.close();
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.sender.close();
    }
}

#[derive(Debug, Clone)]
struct CancelSignal {
    receiver: Receiver<()>,
}

impl CancelSignal {
    fn is_cancelled(&self) -> bool {
        self.receiver.is_closed()
    }

    async fn cancelled(&self) {
        // nothing is ever sent; recv only returns once the channel closes
        let _ = self.receiver.recv().await;
    }
}

/// A running reporter thread. At most one exists per session.
#[derive(Debug)]
pub(crate) struct Reporter {
    generation: u64,
    cancel: CancelHandle,
    thread: Option<JoinHandle<()>>,
}

impl Reporter {
    /// Spawn a reporter that sends a tick for `generation` every `interval`.
    pub(crate) fn spawn(
        generation: u64,
        interval: Duration,
        ticks: Sender<ProgressTick>,
    ) -> std::io::Result<Self> {
        let (cancel, signal) = CancelHandle::new();
        let thread = std::thread::Builder::new()
            .name(format!("playkit-reporter-{generation}"))
            .spawn(move || {
                futures::executor::block_on(run(generation, interval, &signal, &ticks));
                log::debug!("reporter {generation} exited");
            })?;

        Ok(Self {
            generation,
            cancel,
            thread: Some(thread),
        })
    }

    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the reporter and wait for its thread to exit.
    pub(crate) fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("reporter {} panicked", self.generation);
            }
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run(generation: u64, interval: Duration, signal: &CancelSignal, ticks: &Sender<ProgressTick>) {
    loop {
        let delay = Delay::new(interval).fuse();
        let cancelled = signal.cancelled().fuse();
        pin_mut!(delay, cancelled);

        select! {
            () = cancelled => break,
            () = delay => {}
        }

        if signal.is_cancelled() {
            break;
        }

        match ticks.try_send(ProgressTick { generation }) {
            // the host has not drained the previous tick yet; one pending sample is enough
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Closed(_)) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn ticks_carry_generation() {
        let (sender, receiver) = async_channel::bounded(1);
        let reporter = Reporter::spawn(7, Duration::from_millis(10), sender).unwrap();

        let tick = tokio::time::timeout(Duration::from_secs(2), receiver.recv())
            .await
            .expect("tick within timeout")
            .unwrap();
        assert_eq!(tick, ProgressTick { generation: 7 });
        assert_eq!(reporter.generation(), 7);
        reporter.cancel();
    }

    #[test]
    fn cancel_does_not_wait_for_interval() {
        let (sender, receiver) = async_channel::bounded(1);
        let reporter = Reporter::spawn(1, Duration::from_secs(30), sender).unwrap();

        let started = Instant::now();
        reporter.cancel();
        assert!(started.elapsed() < Duration::from_secs(5));
        // the reporter's sender is gone, nothing else will arrive
        assert!(receiver.try_recv().is_err());
        assert!(receiver.is_closed());
    }

    #[test]
    fn exits_when_receiver_dropped() {
        let (sender, receiver) = async_channel::bounded(1);
        drop(receiver);
        let reporter = Reporter::spawn(1, Duration::from_millis(5), sender).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert!(reporter.thread.as_ref().is_some_and(JoinHandle::is_finished));
    }
}
